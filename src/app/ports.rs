use async_trait::async_trait;

use crate::common::error::Result;
use crate::common::types::{EnrichedRecord, LookupOutcome};
use crate::pipeline::processing::flatten::OutputTable;

// Network-side port
#[async_trait]
pub trait LookupPort: Send + Sync {
    /// Look up one email. Every fault is reported through the outcome, never as an error.
    async fn lookup(&self, email: &str) -> LookupOutcome;
}

// Boundary ports
#[async_trait]
pub trait EmailSourcePort: Send + Sync {
    /// Ordered emails to enrich, duplicates included.
    async fn read_emails(&self) -> Result<Vec<String>>;
}

#[async_trait]
pub trait TableSinkPort: Send + Sync {
    async fn write_table(&self, table: &OutputTable) -> Result<()>;
}

#[async_trait]
pub trait RawRecordSinkPort: Send + Sync {
    async fn write_records(&self, records: &[EnrichedRecord]) -> Result<()>;
}

pub trait ProgressPort: Send + Sync {
    /// Called once per accumulated record with the running count.
    fn on_progress(&self, completed: usize, total: usize);
}
