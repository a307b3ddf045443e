use serde::Serialize;

use super::{DatasetOutput, Formatter, iso8601_timestamp};
use crate::dataset::Provenance;
use crate::error::{Result, SyncError};

pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonDataset<'a> {
    name: &'a str,
    generated_at: String,
    sampling_frequency_hz: f64,
    samples: usize,
    quantities: Vec<JsonQuantity<'a>>,
}

#[derive(Serialize)]
struct JsonQuantity<'a> {
    quantity: &'static str,
    provenance: Provenance,
    constant: bool,
    values: &'a [f32],
}

impl Formatter for JsonFormatter {
    fn format(&self, output: &DatasetOutput<'_>) -> Result<String> {
        let dataset = output.dataset;
        let doc = JsonDataset {
            name: output.name,
            generated_at: iso8601_timestamp(),
            sampling_frequency_hz: output.sampling_frequency_hz,
            samples: dataset.len(),
            quantities: dataset
                .populated()
                .filter_map(|(q, values)| {
                    Some(JsonQuantity {
                        quantity: q.label(),
                        provenance: dataset.provenance(q)?,
                        constant: dataset.is_constant(q),
                        values,
                    })
                })
                .collect(),
        };

        serde_json::to_string_pretty(&doc).map_err(|e| SyncError::Output(e.to_string()))
    }
}
