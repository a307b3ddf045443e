mod profile;
mod recording;

pub use profile::InsertionProfile;
pub use recording::{RecordingConfig, pairs_to_text, record_channel};
