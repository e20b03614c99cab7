use std::io::Read;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use crate::app::ports::EmailSourcePort;
use crate::common::constants::EMAIL_COLUMN;
use crate::common::error::{EnricherError, Result};

/// Reads the `email` column of a delimited file with a header row.
pub struct CsvEmailSource {
    path: PathBuf,
}

impl CsvEmailSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Emails in file order. Cells are passed through untouched, empty ones included.
pub fn read_emails_from<R: Read>(reader: R, source_name: &str) -> Result<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let idx = rdr
        .headers()?
        .iter()
        .position(|h| h.trim() == EMAIL_COLUMN)
        .ok_or_else(|| EnricherError::MissingColumn {
            column: EMAIL_COLUMN.to_string(),
            source_name: source_name.to_string(),
        })?;

    let mut emails = Vec::new();
    for result in rdr.records() {
        let record = result?;
        emails.push(record.get(idx).unwrap_or_default().to_string());
    }
    Ok(emails)
}

#[async_trait]
impl EmailSourcePort for CsvEmailSource {
    async fn read_emails(&self) -> Result<Vec<String>> {
        let file = std::fs::File::open(&self.path)?;
        let emails = read_emails_from(file, &self.path.display().to_string())?;
        info!("Loaded {} emails from {}", emails.len(), self.path.display());
        Ok(emails)
    }
}
