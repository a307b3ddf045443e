use crate::channel::ConstantDeclaration;
use crate::config::{BindConfig, DuplicatePolicy};
use crate::constants::GRID_SNAP_TOLERANCE;
use crate::dataset::{Provenance, SynchronizedDataset};
use crate::error::{Result, SyncError};
use crate::pipeline::resample::ResampledChannel;
use crate::quantity::Quantity;

/// Routes resampled channels and constant declarations into named slots
///
/// A channel's grid fills the slot of its independent quantity and its
/// values fill the slot of its dependent quantity. Constants are bound after
/// all channels and broadcast over the shared sample count.
pub struct QuantityBinder {
    duplicate_policy: DuplicatePolicy,
}

impl QuantityBinder {
    pub fn new(config: &BindConfig) -> Self {
        Self {
            duplicate_policy: config.duplicate_policy,
        }
    }

    pub fn bind(
        &self,
        channels: Vec<ResampledChannel>,
        constants: &[ConstantDeclaration],
    ) -> Result<SynchronizedDataset> {
        let first = channels.first().ok_or(SyncError::EmptyChannelSet)?;
        let len = first.len();
        let independent = first.independent;
        let origin = first.grid[0];
        let origin_tolerance = GRID_SNAP_TOLERANCE * (origin.abs() as f64).max(1.0);

        for channel in &channels {
            if channel.len() != len {
                return Err(SyncError::LengthMismatch {
                    channel: channel.name.clone(),
                    expected: len,
                    found: channel.len(),
                });
            }
            if ((channel.grid[0] - origin).abs() as f64) > origin_tolerance {
                return Err(SyncError::GridOffset {
                    channel: channel.name.clone(),
                    expected: origin,
                    found: channel.grid[0],
                });
            }
            if channel.independent != independent {
                return Err(SyncError::MixedIndependent {
                    first: independent,
                    other: channel.independent,
                });
            }
        }

        let mut dataset = SynchronizedDataset::with_len(len);

        for channel in channels {
            dataset.set(channel.independent, channel.grid, Provenance::Independent);

            let replaced = dataset.set(channel.dependent, channel.values, Provenance::Measured);
            self.check_duplicate(channel.dependent, replaced)?;
        }

        for constant in constants {
            let replaced = dataset.set_constant(constant.quantity, constant.value);
            self.check_duplicate(constant.quantity, replaced)?;
        }

        log::debug!(
            "Bound {} quantities over {} samples",
            dataset.populated().count(),
            len
        );

        Ok(dataset)
    }

    fn check_duplicate(&self, quantity: Quantity, replaced: Option<Provenance>) -> Result<()> {
        let Some(previous) = replaced else {
            return Ok(());
        };
        match self.duplicate_policy {
            DuplicatePolicy::Reject => Err(SyncError::DuplicateQuantity(quantity)),
            DuplicatePolicy::LastWins => {
                log::warn!(
                    "{} supplied more than once, replacing {:?} values",
                    quantity,
                    previous
                );
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resampled(dependent: Quantity, values: Vec<f32>) -> ResampledChannel {
        ResampledChannel {
            name: dependent.column().to_string(),
            independent: Quantity::Time,
            dependent,
            grid: (0..values.len()).map(|i| i as f32).collect(),
            values,
        }
    }

    fn binder(policy: DuplicatePolicy) -> QuantityBinder {
        QuantityBinder::new(&BindConfig {
            duplicate_policy: policy,
        })
    }

    #[test]
    fn test_bind_routes_by_quantity() {
        let dataset = binder(DuplicatePolicy::LastWins)
            .bind(
                vec![
                    resampled(Quantity::DisplacementX, vec![0.0, 1.0, 2.0]),
                    resampled(Quantity::ForceX, vec![5.0, 6.0, 7.0]),
                ],
                &[],
            )
            .unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.time(), Some(&[0.0, 1.0, 2.0][..]));
        assert_eq!(dataset.displacement(), Some(&[0.0, 1.0, 2.0][..]));
        assert_eq!(dataset.force(), Some(&[5.0, 6.0, 7.0][..]));
        assert_eq!(dataset.velocity(), None);
        assert_eq!(dataset.provenance(Quantity::Time), Some(Provenance::Independent));
        assert_eq!(
            dataset.provenance(Quantity::ForceX),
            Some(Provenance::Measured)
        );
    }

    #[test]
    fn test_bind_constant_broadcast() {
        let dataset = binder(DuplicatePolicy::LastWins)
            .bind(
                vec![resampled(Quantity::ForceX, vec![1.0, 2.0])],
                &[ConstantDeclaration {
                    quantity: Quantity::VelocityX,
                    value: 3.0,
                }],
            )
            .unwrap();

        assert_eq!(dataset.velocity(), Some(&[3.0, 3.0][..]));
        assert!(dataset.is_constant(Quantity::VelocityX));
        assert!(!dataset.is_constant(Quantity::ForceX));
    }

    #[test]
    fn test_duplicate_last_wins() {
        let dataset = binder(DuplicatePolicy::LastWins)
            .bind(
                vec![
                    resampled(Quantity::ForceX, vec![1.0, 2.0]),
                    resampled(Quantity::ForceX, vec![3.0, 4.0]),
                ],
                &[],
            )
            .unwrap();
        assert_eq!(dataset.force(), Some(&[3.0, 4.0][..]));
    }

    #[test]
    fn test_duplicate_rejected() {
        let err = binder(DuplicatePolicy::Reject)
            .bind(
                vec![
                    resampled(Quantity::ForceX, vec![1.0, 2.0]),
                    resampled(Quantity::ForceX, vec![3.0, 4.0]),
                ],
                &[],
            )
            .unwrap_err();
        assert!(matches!(err, SyncError::DuplicateQuantity(Quantity::ForceX)));
    }

    #[test]
    fn test_constant_over_measured_is_duplicate() {
        let err = binder(DuplicatePolicy::Reject)
            .bind(
                vec![resampled(Quantity::VelocityX, vec![1.0, 2.0])],
                &[ConstantDeclaration {
                    quantity: Quantity::VelocityX,
                    value: 1.5,
                }],
            )
            .unwrap_err();
        assert!(matches!(
            err,
            SyncError::DuplicateQuantity(Quantity::VelocityX)
        ));
    }

    #[test]
    fn test_shared_independent_is_not_duplicate() {
        let result = binder(DuplicatePolicy::Reject).bind(
            vec![
                resampled(Quantity::DisplacementX, vec![0.0, 1.0]),
                resampled(Quantity::ForceX, vec![0.0, 1.0]),
            ],
            &[],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_length_mismatch() {
        let err = binder(DuplicatePolicy::LastWins)
            .bind(
                vec![
                    resampled(Quantity::DisplacementX, vec![0.0, 1.0, 2.0]),
                    resampled(Quantity::ForceX, vec![0.0, 1.0]),
                ],
                &[],
            )
            .unwrap_err();
        assert!(matches!(
            err,
            SyncError::LengthMismatch {
                expected: 3,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_offset_grid_rejected() {
        let mut offset = resampled(Quantity::ForceX, vec![3.0, 13.0, 23.0]);
        offset.grid = vec![0.3, 1.3, 2.3];
        let err = binder(DuplicatePolicy::LastWins)
            .bind(
                vec![
                    resampled(Quantity::DisplacementX, vec![0.0, 1.0, 2.0]),
                    offset,
                ],
                &[],
            )
            .unwrap_err();
        assert!(
            matches!(err, SyncError::GridOffset { expected, found, .. } if expected == 0.0 && found == 0.3),
            "{}",
            err
        );
    }

    #[test]
    fn test_mixed_independent() {
        let mut other = resampled(Quantity::ForceX, vec![0.0, 1.0]);
        other.independent = Quantity::DisplacementX;
        let err = binder(DuplicatePolicy::LastWins)
            .bind(
                vec![resampled(Quantity::RotationX, vec![0.0, 1.0]), other],
                &[],
            )
            .unwrap_err();
        assert!(matches!(err, SyncError::MixedIndependent { .. }));
    }

    #[test]
    fn test_no_channels() {
        let err = binder(DuplicatePolicy::LastWins)
            .bind(vec![], &[])
            .unwrap_err();
        assert!(matches!(err, SyncError::EmptyChannelSet));
    }
}
