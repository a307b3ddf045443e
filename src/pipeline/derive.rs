//! Derivation of quantities that were not recorded.
//!
//! Two rules, applied in order, each filling only an empty slot:
//!
//! 1. Time from constant velocity: with no time base and a constant
//!    velocity, `time = displacement / velocity`.
//! 2. Velocity from displacement: with a time base (grid, measured, or derived)
//!    and no velocity (measured or constant), velocity is the central difference of displacement over
//!    time.
//!
//! Because neither rule touches a populated slot, running the engine on its
//! own output returns it unchanged.

use crate::config::{BoundaryRule, DerivationConfig};
use crate::constants::DERIVATIVE_EPSILON;
use crate::dataset::{Provenance, SynchronizedDataset};
use crate::error::{Result, SyncError};
use crate::quantity::Quantity;

pub struct DerivationEngine {
    boundary_rule: BoundaryRule,
}

impl DerivationEngine {
    pub fn new(config: &DerivationConfig) -> Self {
        Self {
            boundary_rule: config.boundary_rule,
        }
    }

    pub fn derive(&self, mut dataset: SynchronizedDataset) -> Result<SynchronizedDataset> {
        if let Some(time) = time_from_constant_velocity(&dataset)? {
            log::info!("Derived time from displacement under constant velocity");
            dataset.set(Quantity::Time, time, Provenance::Derived);
        }

        if let Some(velocity) = self.velocity_from_displacement(&dataset)? {
            log::info!("Derived velocity from displacement by central difference");
            dataset.set(Quantity::VelocityX, velocity, Provenance::Derived);
        }

        Ok(dataset)
    }

    fn velocity_from_displacement(&self, dataset: &SynchronizedDataset) -> Result<Option<Vec<f32>>> {
        if dataset.velocity().is_some() || dataset.is_constant(Quantity::VelocityX) {
            return Ok(None);
        }
        let Some(time) = dataset.time() else {
            return Ok(None);
        };
        let Some(displacement) = dataset.displacement() else {
            log::debug!("No displacement recorded, velocity left unset");
            return Ok(None);
        };

        central_difference(time, displacement, self.boundary_rule).map(Some)
    }
}

fn time_from_constant_velocity(dataset: &SynchronizedDataset) -> Result<Option<Vec<f32>>> {
    if dataset.time().is_some() {
        return Ok(None);
    }
    let Some(velocity) = dataset.constant_value(Quantity::VelocityX) else {
        return Ok(None);
    };
    if velocity == 0.0 || !velocity.is_finite() {
        return Err(SyncError::InvalidConstant {
            quantity: Quantity::VelocityX,
            value: velocity,
        });
    }
    let displacement = dataset
        .displacement()
        .ok_or(SyncError::MissingQuantity {
            quantity: Quantity::DisplacementX,
            target: Quantity::Time,
        })?;

    Ok(Some(displacement.iter().map(|d| d / velocity).collect()))
}

/// Derivative of `x` with respect to `t` by central difference.
///
/// Interior points use `(x[i+1] - x[i-1]) / (t[i+1] - t[i-1])`. The two end
/// points follow `rule`:
/// - `ZeroNeighbour` stands in `(t, x) = (0, 0)` for the missing neighbour and
///   divides by twice the span to it, so `v[0] = x[1] / (2 * t[1])` and
///   `v[n-1] = x[n-2] / (2 * t[n-2])`
/// - `OneSided` uses forward and backward differences
///
/// A zero span is replaced by [`DERIVATIVE_EPSILON`].
pub fn central_difference(t: &[f32], x: &[f32], rule: BoundaryRule) -> Result<Vec<f32>> {
    let n = t.len().min(x.len());
    if n < 2 {
        return Err(SyncError::InsufficientSamples {
            channel: Quantity::DisplacementX.column().to_string(),
            needed: 2,
            available: n,
        });
    }

    let slope = |dx: f32, dt: f32| {
        let dt = if dt == 0.0 { DERIVATIVE_EPSILON } else { dt };
        dx / dt
    };

    let mut v = Vec::with_capacity(n);

    v.push(match rule {
        BoundaryRule::ZeroNeighbour => slope(x[1] - 0.0, 2.0 * (t[1] - 0.0)),
        BoundaryRule::OneSided => slope(x[1] - x[0], t[1] - t[0]),
    });

    for i in 1..n - 1 {
        v.push(slope(x[i + 1] - x[i - 1], t[i + 1] - t[i - 1]));
    }

    v.push(match rule {
        BoundaryRule::ZeroNeighbour => slope(0.0 - x[n - 2], 2.0 * (0.0 - t[n - 2])),
        BoundaryRule::OneSided => slope(x[n - 1] - x[n - 2], t[n - 1] - t[n - 2]),
    });

    Ok(v)
}
