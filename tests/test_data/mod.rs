#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use axialsync::config::{SamplingFrequency, SyncConfig};
use axialsync::{Channel, Quantity, SyncPipeline};

/// Scratch directory holding channel files and a manifest, removed on drop
pub struct TempDataset {
    dir: PathBuf,
}

impl TempDataset {
    pub fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("axialsync-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create temp dataset dir");
        Self { dir }
    }

    pub fn write(&self, file: &str, contents: &str) -> &Self {
        fs::write(self.dir.join(file), contents).expect("write temp file");
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }
}

impl Drop for TempDataset {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

pub fn channel(dependent: Quantity, independent: Quantity, pairs: &[(f32, f32)]) -> Channel {
    Channel::from_pairs(
        dependent.column(),
        independent,
        dependent,
        pairs.to_vec(),
    )
    .expect("valid channel")
}

pub fn config(hz: f64) -> SyncConfig {
    let mut config = SyncConfig::default();
    config.resample.sampling_frequency = SamplingFrequency::from_hz(hz).expect("positive frequency");
    config
}

pub fn pipeline(hz: f64) -> SyncPipeline {
    SyncPipeline::new(&config(hz))
}
