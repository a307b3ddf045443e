//! Dataset manifests.
//!
//! A manifest names the sampling frequency of a dataset and lists its
//! measurements, each either backed by a two-column file or declared
//! constant. TOML and JSON are accepted, chosen by file extension:
//!
//! ```toml
//! name = "liver-ex-vivo-01"
//! sampling_frequency = "100hz"
//!
//! [loader]
//! has_header = true
//!
//! [[measurement]]
//! quantity = "Displacement x"
//! dependence = "Time"
//! file = "displacement.csv"
//!
//! [[measurement]]
//! quantity = "Velocity x"
//! constant = 5.0
//! ```
//!
//! Relative `file` paths resolve against the manifest's directory.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::channel::ChannelDescriptor;
use crate::config::{
    BoundaryRule, BracketPolicy, DuplicatePolicy, LoaderConfig, SamplingFrequency, SyncConfig,
};
use crate::error::{Result, SyncError};
use crate::loader::FileSystemSource;
use crate::quantity::Quantity;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetManifest {
    #[serde(default)]
    pub name: Option<String>,
    pub sampling_frequency: SamplingFrequency,
    #[serde(default)]
    pub loader: LoaderConfig,
    #[serde(default)]
    pub bracket_policy: Option<BracketPolicy>,
    #[serde(default)]
    pub boundary_rule: Option<BoundaryRule>,
    #[serde(default)]
    pub duplicate_policy: Option<DuplicatePolicy>,
    #[serde(rename = "measurement", alias = "measurements")]
    pub measurements: Vec<MeasurementEntry>,
    #[serde(skip)]
    base_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeasurementEntry {
    pub quantity: Quantity,
    #[serde(default = "default_dependence")]
    pub dependence: Quantity,
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub constant: Option<f32>,
}

fn default_dependence() -> Quantity {
    Quantity::Time
}

impl MeasurementEntry {
    pub fn descriptor(&self) -> Result<ChannelDescriptor> {
        match (&self.file, self.constant) {
            (Some(file), None) => Ok(ChannelDescriptor::recorded(
                self.quantity,
                self.dependence,
                file.clone(),
            )),
            (None, Some(value)) => Ok(ChannelDescriptor::constant(
                self.quantity,
                self.dependence,
                value,
            )),
            (Some(_), Some(_)) => Err(SyncError::Config(format!(
                "{} has both a file and a constant",
                self.quantity
            ))),
            (None, None) => Err(SyncError::Config(format!(
                "{} needs either a file or a constant",
                self.quantity
            ))),
        }
    }
}

impl DatasetManifest {
    /// Read a manifest, dispatching on the file extension.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SyncError::Io {
            file: path.to_path_buf(),
            source: e,
        })?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        let mut manifest = match ext.as_str() {
            "toml" => Self::from_toml(&content),
            "json" => Self::from_json(&content),
            other => Err(SyncError::Config(format!(
                "unsupported manifest extension: .{}",
                other
            ))),
        }?;

        manifest.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(manifest)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| SyncError::Config(e.to_string()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| SyncError::Config(e.to_string()))
    }

    /// Name of the dataset, falling back to the manifest's directory name
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.base_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "dataset".to_string())
        })
    }

    pub fn descriptors(&self) -> Result<Vec<ChannelDescriptor>> {
        self.measurements.iter().map(|m| m.descriptor()).collect()
    }

    /// Source that resolves channel files against the manifest's directory
    pub fn source(&self) -> FileSystemSource {
        FileSystemSource::new(&self.base_dir)
    }

    /// Pipeline configuration described by this manifest
    pub fn config(&self) -> SyncConfig {
        let mut config = SyncConfig::default();
        config.loader = self.loader.clone();
        config.resample.sampling_frequency = self.sampling_frequency;
        if let Some(policy) = self.bracket_policy {
            config.resample.bracket_policy = policy;
        }
        if let Some(rule) = self.boundary_rule {
            config.derivation.boundary_rule = rule;
        }
        if let Some(policy) = self.duplicate_policy {
            config.bind.duplicate_policy = policy;
        }
        config
    }
}
