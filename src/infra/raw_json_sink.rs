use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::app::ports::RawRecordSinkPort;
use crate::common::error::Result;
use crate::common::types::{EnrichedRecord, RawRecord};

/// Dumps the unflattened API responses as a JSON array of
/// `{"email": ..., "api_data": ...}` objects, four-space indented.
pub struct RawJsonSink {
    path: PathBuf,
}

impl RawJsonSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

pub fn write_records_to<W: Write>(writer: W, records: &[EnrichedRecord]) -> Result<()> {
    let raw: Vec<RawRecord<'_>> = records.iter().map(EnrichedRecord::as_raw).collect();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
    raw.serialize(&mut ser)?;
    Ok(())
}

#[async_trait]
impl RawRecordSinkPort for RawJsonSink {
    async fn write_records(&self, records: &[EnrichedRecord]) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let mut writer = std::io::BufWriter::new(std::fs::File::create(&self.path)?);
        write_records_to(&mut writer, records)?;
        writer.flush()?;
        info!("Saved {} raw responses to {}", records.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::{LookupFailure, LookupOutcome};
    use serde_json::{json, Value};

    #[test]
    fn test_dump_shape_and_indent() {
        let records = vec![
            EnrichedRecord::new("a@x.com", LookupOutcome::Failure(LookupFailure::Status(429))),
            EnrichedRecord::new("b@x.com", LookupOutcome::Success(json!({"person": {"firstName": "Jane"}}))),
        ];
        let mut buf = Vec::new();
        write_records_to(&mut buf, &records).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("\n    {\n        \"email\": \"a@x.com\""));
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            parsed,
            json!([
                {"email": "a@x.com", "api_data": null},
                {"email": "b@x.com", "api_data": {"person": {"firstName": "Jane"}}}
            ])
        );
    }
}
