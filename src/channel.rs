use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{Result, SyncError};
use crate::quantity::Quantity;

/// One recorded sensor stream
///
/// Samples are stored as parallel `x` (independent) and `y` (dependent)
/// vectors, sorted ascending by `x`. A channel always holds at least two
/// samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    name: String,
    independent: Quantity,
    dependent: Quantity,
    x: Vec<f32>,
    y: Vec<f32>,
}

impl Channel {
    pub const MIN_SAMPLES: usize = 2;

    /// Build a channel from unordered sample pairs, sorting them by `x`.
    pub fn from_pairs(
        name: impl Into<String>,
        independent: Quantity,
        dependent: Quantity,
        mut pairs: Vec<(f32, f32)>,
    ) -> Result<Self> {
        let name = name.into();
        if pairs.len() < Self::MIN_SAMPLES {
            return Err(SyncError::InsufficientSamples {
                channel: name,
                needed: Self::MIN_SAMPLES,
                available: pairs.len(),
            });
        }

        // Stable, so rows sharing an x keep their file order
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        let (x, y) = pairs.into_iter().unzip();

        Ok(Self {
            name,
            independent,
            dependent,
            x,
            y,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn independent(&self) -> Quantity {
        self.independent
    }

    pub fn dependent(&self) -> Quantity {
        self.dependent
    }

    pub fn x(&self) -> &[f32] {
        &self.x
    }

    pub fn y(&self) -> &[f32] {
        &self.y
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Last (largest) independent value
    pub fn last_x(&self) -> f32 {
        self.x[self.x.len() - 1]
    }

    /// Consume the channel and return it with one more sample at the end.
    /// `x` must not be smaller than the current last sample.
    pub(crate) fn with_appended(mut self, x: f32, y: f32) -> Self {
        debug_assert!(x >= self.last_x());
        self.x.push(x);
        self.y.push(y);
        self
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} vs {})",
            self.name, self.dependent, self.independent
        )
    }
}

/// Assertion that a quantity was held fixed during the experiment
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ConstantDeclaration {
    pub quantity: Quantity,
    pub value: f32,
}

/// Where a measurement's values come from
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelSource {
    /// Two-column raw sample file
    File(PathBuf),
    /// Declared constant, no file
    Constant(f32),
}

/// Role metadata for one measurement of a dataset
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelDescriptor {
    pub dependent: Quantity,
    pub independent: Quantity,
    pub source: ChannelSource,
}

impl ChannelDescriptor {
    pub fn recorded(dependent: Quantity, independent: Quantity, file: impl Into<PathBuf>) -> Self {
        Self {
            dependent,
            independent,
            source: ChannelSource::File(file.into()),
        }
    }

    pub fn constant(dependent: Quantity, independent: Quantity, value: f32) -> Self {
        Self {
            dependent,
            independent,
            source: ChannelSource::Constant(value),
        }
    }
}

/// Raw channels and constant declarations of one dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelSet {
    pub channels: Vec<Channel>,
    pub constants: Vec<ConstantDeclaration>,
}

impl ChannelSet {
    pub fn new(channels: Vec<Channel>, constants: Vec<ConstantDeclaration>) -> Self {
        Self {
            channels,
            constants,
        }
    }

    pub fn is_constant(&self, quantity: Quantity) -> bool {
        self.constants.iter().any(|c| c.quantity == quantity)
    }
}
