pub mod channel;
pub mod config;
pub mod constants;
pub mod dataset;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod output;
pub mod pipeline;
pub mod processing;
pub mod quantity;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use channel::{Channel, ChannelDescriptor, ChannelSet, ChannelSource, ConstantDeclaration};
pub use config::{SamplingFrequency, SyncConfig};
pub use dataset::{Provenance, SynchronizedDataset};
pub use error::{Result, SyncError};
pub use loader::{FileSystemSource, MemorySource, SampleSource, SeriesLoader};
pub use manifest::DatasetManifest;
pub use processing::SyncPipeline;
pub use quantity::Quantity;
