use rand::RngExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use super::InsertionProfile;
use crate::quantity::Quantity;

/// How a simulated sensor samples the insertion
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct RecordingConfig {
    pub seed: Option<u64>,
    /// Nominal sample rate in Hz
    pub rate_hz: f32,
    /// Length of this sensor's recording in seconds
    pub duration_secs: f32,
    /// Sample time jitter as a fraction of the nominal interval (0-0.9)
    pub jitter: f32,
    /// Standard deviation of additive Gaussian noise on the values
    pub noise_std: f32,
    /// Emit rows in random order
    pub shuffle: bool,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            seed: None,
            rate_hz: 100.0,
            duration_secs: 5.0,
            jitter: 0.3,
            noise_std: 0.0,
            shuffle: false,
        }
    }
}

impl RecordingConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_rate(mut self, rate_hz: f32) -> Self {
        self.rate_hz = rate_hz;
        self
    }

    pub fn with_duration(mut self, duration_secs: f32) -> Self {
        self.duration_secs = duration_secs;
        self
    }

    pub fn with_jitter(mut self, jitter: f32) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_noise(mut self, noise_std: f32) -> Self {
        self.noise_std = noise_std;
        self
    }

    pub fn shuffled(mut self) -> Self {
        self.shuffle = true;
        self
    }
}

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}

/// Sample `quantity` against time with a jittered, non-uniform clock.
///
/// The first sample is always at t = 0 and the last at `duration_secs`.
pub fn record_channel(
    profile: &InsertionProfile,
    quantity: Quantity,
    config: &RecordingConfig,
) -> Vec<(f32, f32)> {
    let mut rng = create_rng(config.seed);
    let interval = 1.0 / config.rate_hz;
    let jitter = config.jitter.clamp(0.0, 0.9) * interval;
    let count = (config.duration_secs * config.rate_hz).round().max(1.0) as usize;

    let noise = if config.noise_std > 0.0 {
        Normal::new(0.0, config.noise_std as f64).ok()
    } else {
        None
    };

    let mut pairs: Vec<(f32, f32)> = (0..=count)
        .map(|i| {
            let t = if i == 0 {
                0.0
            } else if i == count {
                config.duration_secs
            } else {
                i as f32 * interval + (rng.random::<f32>() - 0.5) * jitter
            };
            let mut value = profile.value(quantity, t);
            if let Some(normal) = &noise {
                value += normal.sample(&mut rng) as f32;
            }
            (t, value)
        })
        .collect();

    if config.shuffle {
        for i in (1..pairs.len()).rev() {
            let j = ((rng.random::<f32>() * (i + 1) as f32) as usize).min(i);
            pairs.swap(i, j);
        }
    }

    pairs
}

/// Render sample pairs as two-column comma-separated text
pub fn pairs_to_text(pairs: &[(f32, f32)]) -> String {
    pairs.iter().map(|(x, y)| format!("{},{}\n", x, y)).collect()
}
