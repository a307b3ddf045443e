//! Configuration for the synchronization pipeline.
//!
//! ## Open behaviours
//!
//! Three behaviours of the pipeline have more than one defensible answer and
//! are selected here rather than hard-coded:
//!
//! ```ignore
//! resample.bracket_policy: BracketPolicy::Snap,        // or BracketPolicy::Strict
//! derivation.boundary_rule: BoundaryRule::ZeroNeighbour, // or BoundaryRule::OneSided
//! bind.duplicate_policy: DuplicatePolicy::LastWins,    // or DuplicatePolicy::Reject
//! ```

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Sampling frequency of the shared output grid
///
/// Expressed per unit of the independent variable (Hz when the independent
/// variable is time). Can be given as a frequency or as a grid period.
///
/// # Parsing formats
/// - `100` - frequency in Hz (no suffix)
/// - `100hz` or `100Hz` - frequency in Hz (explicit)
/// - `10ms`, `250us`, `0.5s` - grid period
///
/// # Example
/// ```
/// use axialsync::config::SamplingFrequency;
///
/// let freq: SamplingFrequency = "4ms".parse().unwrap();
/// assert!((freq.as_hz() - 250.0).abs() < 1e-9);
/// assert!((freq.period() - 0.004).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingFrequency(f64);

impl SamplingFrequency {
    /// Create from frequency in Hz
    pub fn from_hz(hz: f64) -> Result<Self, String> {
        if !hz.is_finite() || hz <= 0.0 {
            return Err(format!("sampling frequency must be positive, got {}", hz));
        }
        Ok(Self(hz))
    }

    /// Create from grid period in seconds
    pub fn from_period_secs(secs: f64) -> Result<Self, String> {
        if !secs.is_finite() || secs <= 0.0 {
            return Err(format!("period must be positive, got {}", secs));
        }
        Self::from_hz(1.0 / secs)
    }

    /// Get frequency in Hz
    pub fn as_hz(&self) -> f64 {
        self.0
    }

    /// Grid step, `1 / frequency`
    pub fn period(&self) -> f64 {
        1.0 / self.0
    }
}

impl Default for SamplingFrequency {
    fn default() -> Self {
        Self(100.0)
    }
}

impl fmt::Display for SamplingFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}hz", self.0)
    }
}

impl FromStr for SamplingFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();

        // Period suffixes, longest first so "ms" is not read as "s"
        for (suffix, scale) in [("ms", 1e-3), ("us", 1e-6), ("μs", 1e-6), ("s", 1.0)] {
            if let Some(num) = lower.strip_suffix(suffix) {
                let value: f64 = num
                    .trim()
                    .parse()
                    .map_err(|_| format!("invalid period: {}", s))?;
                return Self::from_period_secs(value * scale);
            }
        }

        let num = lower.strip_suffix("hz").unwrap_or(&lower);
        let hz: f64 = num
            .trim()
            .parse()
            .map_err(|_| format!("invalid frequency: {}", s))?;
        Self::from_hz(hz)
    }
}

impl<'de> Deserialize<'de> for SamplingFrequency {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(hz) => Self::from_hz(hz),
            Repr::Text(s) => s.parse(),
        }
        .map_err(serde::de::Error::custom)
    }
}

/// What the resampler does when a grid point has no strict bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BracketPolicy {
    /// A grid point that coincides with a sample takes that sample's value
    #[default]
    Snap,
    /// Both brackets must exist strictly below and above every grid point
    Strict,
}

/// How the first and last samples are differentiated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BoundaryRule {
    /// Missing neighbour is taken as (0, 0) and the span is doubled
    #[default]
    ZeroNeighbour,
    /// Forward difference at the start, backward difference at the end
    OneSided,
}

/// What the binder does when two sources supply the same quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Keep the last source bound and log a warning
    #[default]
    LastWins,
    /// Fail the dataset
    Reject,
}

/// System-wide synchronization configuration
///
/// # Example
/// ```
/// use axialsync::config::{SamplingFrequency, SyncConfig};
///
/// let mut config = SyncConfig::default();
/// config.resample.sampling_frequency = SamplingFrequency::from_hz(1000.0).unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct SyncConfig {
    /// Raw file parsing
    pub loader: LoaderConfig,
    /// Shared grid construction
    pub resample: ResampleConfig,
    /// Output slot binding
    pub bind: BindConfig,
    /// Missing quantity derivation
    pub derivation: DerivationConfig,
}

/// Raw channel file parsing configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Skip the first non-comment row of every file
    pub has_header: bool,
    /// Field delimiter; detected from the first data row when unset
    pub delimiter: Option<char>,
}

/// Resampling configuration
#[derive(Debug, Clone, Default)]
pub struct ResampleConfig {
    /// Frequency of the shared output grid
    pub sampling_frequency: SamplingFrequency,
    /// Policy for grid points without a strict bracket
    pub bracket_policy: BracketPolicy,
}

/// Binding configuration
#[derive(Debug, Clone, Default)]
pub struct BindConfig {
    /// Policy for quantities supplied more than once
    pub duplicate_policy: DuplicatePolicy,
}

/// Derivation configuration
#[derive(Debug, Clone, Default)]
pub struct DerivationConfig {
    /// Boundary rule for central-difference velocity
    pub boundary_rule: BoundaryRule,
}
