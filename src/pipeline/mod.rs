pub mod align;
pub mod bind;
pub mod derive;
pub mod resample;

pub use align::align;
pub use bind::QuantityBinder;
pub use derive::{DerivationEngine, central_difference};
pub use resample::{ResampledChannel, Resampler};
