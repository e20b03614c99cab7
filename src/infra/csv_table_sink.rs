use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use crate::app::ports::TableSinkPort;
use crate::common::constants::RESULTS_SUFFIX;
use crate::common::error::Result;
use crate::metrics::{MetricName, Metrics};
use crate::pipeline::processing::flatten::{render_cell, OutputTable};

/// Writes the output table as CSV: one header row, then one line per row.
pub struct CsvTableSink {
    path: PathBuf,
}

impl CsvTableSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Default output for an input file: the name up to its first '.', plus
/// `_results.csv`, in the working directory. `contacts.2024.csv` gives
/// `contacts_results.csv`.
pub fn derive_output_path(input: &Path) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base = match file_name.split('.').next() {
        Some(head) if !head.is_empty() => head.to_string(),
        // Dotfiles and empty names fall back to the stem
        _ => input
            .file_stem()
            .map(|s| s.to_string_lossy().trim_start_matches('.').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "enriched".to_string()),
    };
    PathBuf::from(format!("{}{}", base, RESULTS_SUFFIX))
}

pub fn write_table_to<W: Write>(writer: W, table: &OutputTable) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(table.columns())?;
    for row in &table.rows {
        wtr.write_record(row.cells().iter().map(render_cell))?;
    }
    wtr.flush()?;
    Ok(())
}

#[async_trait]
impl TableSinkPort for CsvTableSink {
    async fn write_table(&self, table: &OutputTable) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let file = std::fs::File::create(&self.path)?;
        write_table_to(std::io::BufWriter::new(file), table)?;

        Metrics::counter(MetricName::RowsWritten).increment(table.len() as u64);
        info!("Wrote {} rows to {}", table.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::{EnrichedRecord, LookupFailure, LookupOutcome};
    use serde_json::json;

    #[test]
    fn test_derive_output_path() {
        assert_eq!(derive_output_path(Path::new("/data/in/contacts.csv")), PathBuf::from("contacts_results.csv"));
        assert_eq!(derive_output_path(Path::new("leads.2024.csv")), PathBuf::from("leads_results.csv"));
        assert_eq!(derive_output_path(Path::new("plain")), PathBuf::from("plain_results.csv"));
        assert_eq!(derive_output_path(Path::new(".hidden")), PathBuf::from("hidden_results.csv"));
    }

    #[test]
    fn test_write_table_header_and_rows() {
        let records = vec![
            EnrichedRecord::new("b@x.com", LookupOutcome::Success(json!({"person": {"firstName": "Jane"}}))),
            EnrichedRecord::new("a@x.com", LookupOutcome::Failure(LookupFailure::Status(429))),
        ];
        let table = OutputTable::from_records(&records);

        let mut buf = Vec::new();
        write_table_to(&mut buf, &table).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("email,person.publicIdentifier,"));
        assert!(lines[0].ends_with(",company.fundingData"));
        let first: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(first.len(), table.columns().len());
        assert_eq!(first[0], "b@x.com");
        assert_eq!(first[5], "Jane");
        assert_eq!(lines[2], format!("a@x.com{}", ",".repeat(table.columns().len() - 1)));
    }

    #[test]
    fn test_empty_table_still_has_header() {
        let mut buf = Vec::new();
        write_table_to(&mut buf, &OutputTable::default()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
