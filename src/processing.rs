use crate::channel::{ChannelDescriptor, ChannelSet};
use crate::config::SyncConfig;
use crate::dataset::SynchronizedDataset;
use crate::error::Result;
use crate::loader::{SampleSource, SeriesLoader};
use crate::pipeline::{DerivationEngine, QuantityBinder, ResampledChannel, Resampler, align};

/// Runs the full synchronization pipeline for one dataset at a time
///
/// Load, align, resample, bind, derive. The pipeline holds only configuration,
/// so one instance may process any number of datasets, including from
/// several threads at once.
pub struct SyncPipeline {
    loader: SeriesLoader,
    resampler: Resampler,
    binder: QuantityBinder,
    deriver: DerivationEngine,
}

impl SyncPipeline {
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            loader: SeriesLoader::new(&config.loader),
            resampler: Resampler::new(&config.resample),
            binder: QuantityBinder::new(&config.bind),
            deriver: DerivationEngine::new(&config.derivation),
        }
    }

    /// Load every recorded channel through `source`, then synchronize.
    pub fn run(
        &self,
        descriptors: &[ChannelDescriptor],
        source: &dyn SampleSource,
    ) -> Result<SynchronizedDataset> {
        let set = self.loader.load(descriptors, source)?;
        self.run_channel_set(set)
    }

    /// Synchronize channels that are already in memory.
    pub fn run_channel_set(&self, set: ChannelSet) -> Result<SynchronizedDataset> {
        let ChannelSet {
            channels,
            constants,
        } = set;

        log::info!(
            "Synchronizing {} channels and {} constants at {:.3} Hz",
            channels.len(),
            constants.len(),
            1.0 / self.resampler.step()
        );

        let aligned = align(channels)?;
        let resampled = aligned
            .into_iter()
            .map(|channel| self.resampler.resample(channel))
            .collect::<Result<Vec<ResampledChannel>>>()?;
        let bound = self.binder.bind(resampled, &constants)?;
        let dataset = self.deriver.derive(bound)?;

        log::info!(
            "Synchronized {} quantities over {} samples",
            dataset.populated().count(),
            dataset.len()
        );

        Ok(dataset)
    }
}
