//! Numeric constants for pipeline stability
//!
//! Tolerances used when building the shared grid and when differentiating,
//! so that float drift neither drops grid points nor divides by zero.

/// Substituted for a zero time span in central-difference differentiation.
pub const DERIVATIVE_EPSILON: f32 = 1e-5;

/// Relative tolerance for a grid point to coincide with an original sample.
/// Scaled by `max(step, |g|, 1)` for grid point `g` before comparison.
pub const GRID_SNAP_TOLERANCE: f64 = 1e-6;

/// Fraction of a step forgiven when counting whole steps between the first and
/// last sample of a channel.
pub const GRID_STEP_TOLERANCE: f64 = 1e-6;
