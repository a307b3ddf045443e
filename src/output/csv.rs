use super::{DatasetOutput, Formatter};
use crate::error::Result;

/// One row per sample, one column per populated quantity
pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, output: &DatasetOutput<'_>) -> Result<String> {
        let columns: Vec<_> = output.dataset.populated().collect();

        let header: Vec<&str> = columns.iter().map(|(q, _)| q.column()).collect();
        let mut out = header.join(",");
        out.push('\n');

        for i in 0..output.dataset.len() {
            let row: Vec<String> = columns
                .iter()
                .map(|(_, values)| format!("{}", values[i]))
                .collect();
            out.push_str(&row.join(","));
            out.push('\n');
        }

        Ok(out)
    }
}
