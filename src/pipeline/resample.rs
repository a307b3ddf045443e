use std::fmt;

use crate::channel::Channel;
use crate::config::{BracketPolicy, ResampleConfig};
use crate::constants::{GRID_SNAP_TOLERANCE, GRID_STEP_TOLERANCE};
use crate::error::{Result, SyncError};
use crate::quantity::Quantity;

/// A channel after regridding onto the shared uniform step
#[derive(Debug, Clone, PartialEq)]
pub struct ResampledChannel {
    pub name: String,
    pub independent: Quantity,
    pub dependent: Quantity,
    pub grid: Vec<f32>,
    pub values: Vec<f32>,
}

impl ResampledChannel {
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }
}

impl fmt::Display for ResampledChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} vs {})",
            self.name, self.dependent, self.independent
        )
    }
}

/// Piecewise-linear resampler onto a fixed-step grid
///
/// The grid starts at the channel's first sample, which is copied verbatim,
/// and advances by `1 / sampling_frequency` up to the last whole step that
/// does not pass the channel's final sample. Grid positions are computed from
/// the step index, never accumulated, so spacing stays uniform over long
/// recordings.
///
/// Every grid point after the first is interpolated between the last sample
/// strictly below it and the first sample strictly above it. What happens
/// when a grid point lands on a sample is set by [`BracketPolicy`]:
/// - `Snap` takes that sample's value (within a small relative tolerance,
///   which also absorbs float drift of the final grid point)
/// - `Strict` requires both brackets and fails otherwise
pub struct Resampler {
    step: f64,
    policy: BracketPolicy,
}

impl Resampler {
    pub fn new(config: &ResampleConfig) -> Self {
        Self {
            step: config.sampling_frequency.period(),
            policy: config.bracket_policy,
        }
    }

    /// Grid step, `1 / sampling_frequency`
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Grid positions covering `[x_min, x_max]` in whole steps.
    pub fn grid(&self, x_min: f32, x_max: f32) -> Vec<f64> {
        let x_min = x_min as f64;
        let span = (x_max as f64 - x_min).max(0.0);
        let steps = (span / self.step + GRID_STEP_TOLERANCE).floor() as usize;
        (0..=steps).map(|k| x_min + k as f64 * self.step).collect()
    }

    /// Replace the channel's samples with values on the uniform grid.
    pub fn resample(&self, channel: Channel) -> Result<ResampledChannel> {
        let x = channel.x();
        let y = channel.y();
        let positions = self.grid(x[0], channel.last_x());

        let mut grid = Vec::with_capacity(positions.len());
        let mut values = Vec::with_capacity(positions.len());

        grid.push(x[0]);
        values.push(y[0]);

        for &g in &positions[1..] {
            let value = self
                .value_at(x, y, g)
                .ok_or_else(|| SyncError::Bracketing {
                    channel: channel.name().to_string(),
                    position: g as f32,
                })?;
            grid.push(g as f32);
            values.push(value);
        }

        log::debug!(
            "Resampled {} from {} to {} samples",
            channel,
            x.len(),
            grid.len()
        );

        Ok(ResampledChannel {
            name: channel.name().to_string(),
            independent: channel.independent(),
            dependent: channel.dependent(),
            grid,
            values,
        })
    }

    /// Value at grid position `g`, or `None` when `g` cannot be bracketed.
    fn value_at(&self, x: &[f32], y: &[f32], g: f64) -> Option<f32> {
        // [below, above) are the samples sitting exactly on g
        let below = x.partition_point(|&v| (v as f64) < g);
        let above = x.partition_point(|&v| (v as f64) <= g);

        if self.policy == BracketPolicy::Snap {
            if above > below {
                return Some(y[above - 1]);
            }
            let tolerance = GRID_SNAP_TOLERANCE * self.step.max(g.abs()).max(1.0);
            let near = |i: usize| (x[i] as f64 - g).abs() <= tolerance;
            if above < x.len() && near(above) {
                return Some(y[above]);
            }
            if below > 0 && near(below - 1) {
                return Some(y[below - 1]);
            }
        }

        if below == 0 || above == x.len() {
            return None;
        }

        let (x1, y1) = (x[below - 1] as f64, y[below - 1] as f64);
        let (x2, y2) = (x[above] as f64, y[above] as f64);
        Some((y2 - ((y2 - y1) / (x2 - x1)) * (x2 - g)) as f32)
    }
}
