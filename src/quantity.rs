//! Physical quantities recorded during a needle insertion.
//!
//! Every channel pairs an independent quantity (almost always [`Quantity::Time`])
//! with one dependent quantity. The set is closed: labels outside it are
//! rejected when a manifest is parsed.
//!
//! # Parsing formats
//! - `Displacement x` - the label used by published dataset documents
//! - `Displacement-x`, `displacement_x` - hyphen and underscore forms
//!
//! Matching is case-insensitive.
//!
//! # Example
//! ```
//! use axialsync::Quantity;
//!
//! let q: Quantity = "force-x".parse().unwrap();
//! assert_eq!(q, Quantity::ForceX);
//! assert_eq!(q.label(), "Force x");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Quantity {
    Time,
    DisplacementX,
    VelocityX,
    RotationX,
    ForceX,
}

impl Quantity {
    pub const COUNT: usize = 5;

    pub const ALL: [Quantity; Quantity::COUNT] = [
        Quantity::Time,
        Quantity::DisplacementX,
        Quantity::VelocityX,
        Quantity::RotationX,
        Quantity::ForceX,
    ];

    /// Label as it appears in dataset documents
    pub fn label(&self) -> &'static str {
        match self {
            Quantity::Time => "Time",
            Quantity::DisplacementX => "Displacement x",
            Quantity::VelocityX => "Velocity x",
            Quantity::RotationX => "Rotation x",
            Quantity::ForceX => "Force x",
        }
    }

    /// Column name used by the tabular output formats
    pub fn column(&self) -> &'static str {
        match self {
            Quantity::Time => "time",
            Quantity::DisplacementX => "displacement_x",
            Quantity::VelocityX => "velocity_x",
            Quantity::RotationX => "rotation_x",
            Quantity::ForceX => "force_x",
        }
    }

    /// Position of this quantity in per-quantity tables
    pub fn index(&self) -> usize {
        match self {
            Quantity::Time => 0,
            Quantity::DisplacementX => 1,
            Quantity::VelocityX => 2,
            Quantity::RotationX => 3,
            Quantity::ForceX => 4,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Quantity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | '_' => ' ',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        match normalized.as_str() {
            "time" => Ok(Quantity::Time),
            "displacement x" => Ok(Quantity::DisplacementX),
            "velocity x" => Ok(Quantity::VelocityX),
            "rotation x" => Ok(Quantity::RotationX),
            "force x" => Ok(Quantity::ForceX),
            _ => Err(format!("unknown quantity: {}", s)),
        }
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
