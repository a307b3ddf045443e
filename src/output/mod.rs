mod csv;
mod json;
mod text;

use chrono::Utc;

use crate::dataset::SynchronizedDataset;
use crate::error::Result;

pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// A synchronized dataset together with the name it is reported under
pub struct DatasetOutput<'a> {
    pub name: &'a str,
    pub sampling_frequency_hz: f64,
    pub dataset: &'a SynchronizedDataset,
}

pub trait Formatter: Send {
    fn format(&self, output: &DatasetOutput<'_>) -> Result<String>;
}

pub fn create_formatter(format: OutputFormat, verbose: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(verbose)),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

pub fn iso8601_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
