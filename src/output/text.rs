use std::fmt::Write;

use rolling_stats::Stats;

use super::{DatasetOutput, Formatter};
use crate::error::Result;

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, output: &DatasetOutput<'_>) -> Result<String> {
        let dataset = output.dataset;
        let mut out = String::new();

        let _ = writeln!(out, "=== {} ===", output.name);
        let _ = writeln!(
            out,
            "Samples: {} at {} Hz",
            dataset.len(),
            output.sampling_frequency_hz
        );

        for (quantity, values) in dataset.populated() {
            let mut stats: Stats<f32> = Stats::new();
            for &v in values {
                stats.update(v);
            }
            let provenance = dataset
                .provenance(quantity)
                .map_or("-".to_string(), |p| format!("{:?}", p).to_lowercase());

            if self.verbose {
                let _ = writeln!(
                    out,
                    "  {:<15} {:<12} mean: {:>12.4} std: {:>10.4} min: {:>12.4} max: {:>12.4}",
                    quantity.label(),
                    provenance,
                    stats.mean,
                    stats.std_dev,
                    stats.min,
                    stats.max
                );
            } else {
                let _ = writeln!(
                    out,
                    "  {:<15} {:<12} range: {:.4} .. {:.4}",
                    quantity.label(),
                    provenance,
                    stats.min,
                    stats.max
                );
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::sample_dataset;

    #[test]
    fn test_text_lists_every_quantity() {
        let dataset = sample_dataset();
        let text = TextFormatter::new(true)
            .format(&DatasetOutput {
                name: "phantom",
                sampling_frequency_hz: 2.0,
                dataset: &dataset,
            })
            .unwrap();

        assert!(text.starts_with("=== phantom ==="));
        assert!(text.contains("Samples: 3"));
        assert!(text.contains("Force x"));
        assert!(text.contains("constant"));
        assert!(!text.contains("Rotation x"));
    }
}
