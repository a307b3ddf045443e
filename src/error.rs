use std::path::PathBuf;

use thiserror::Error;

use crate::quantity::Quantity;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Failed to read {file}: {source}")]
    Io {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed data in {file} at line {line}: {reason}")]
    MalformedData {
        file: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("Insufficient samples in {channel}: need {needed}, have {available}")]
    InsufficientSamples {
        channel: String,
        needed: usize,
        available: usize,
    },

    #[error("No interpolation bracket for grid point {position} in {channel}")]
    Bracketing { channel: String, position: f32 },

    #[error("{quantity} is required to derive {target} but was not supplied")]
    MissingQuantity { quantity: Quantity, target: Quantity },

    #[error("Dataset has no recorded channels")]
    EmptyChannelSet,

    #[error("Channel {channel} has {found} samples after resampling, expected {expected}")]
    LengthMismatch {
        channel: String,
        expected: usize,
        found: usize,
    },

    #[error("Channel {channel} grid starts at {found}, expected {expected}")]
    GridOffset {
        channel: String,
        expected: f32,
        found: f32,
    },

    #[error("Channels disagree on the independent quantity: {first} and {other}")]
    MixedIndependent { first: Quantity, other: Quantity },

    #[error("{0} is supplied by more than one source")]
    DuplicateQuantity(Quantity),

    #[error("Constant {quantity} = {value} cannot be used")]
    InvalidConstant { quantity: Quantity, value: f32 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Output formatting failed: {0}")]
    Output(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;
