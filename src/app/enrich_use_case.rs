use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument};

use crate::app::ports::{EmailSourcePort, LookupPort, ProgressPort, RawRecordSinkPort, TableSinkPort};
use crate::common::constants::PREVIEW_ROWS;
use crate::common::error::Result;
use crate::common::types::EnrichedRecord;
use crate::metrics::{MetricName, Metrics};
use crate::pipeline::ingestion::rate_limiter::ConcurrencyLimiter;
use crate::pipeline::ingestion::scheduler::enrich_all;
use crate::pipeline::processing::flatten::{render_cell, OutputTable};

/// Counts for one finished batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_records(records: &[EnrichedRecord]) -> Self {
        let succeeded = records.iter().filter(|r| r.outcome.is_success()).count();
        Self {
            total: records.len(),
            succeeded,
            failed: records.len() - succeeded,
        }
    }
}

/// Everything a batch run produces
#[derive(Debug, Clone)]
pub struct BatchOutput {
    /// Records in completion order
    pub records: Vec<EnrichedRecord>,
    /// One row per record, same order
    pub table: OutputTable,
    pub summary: BatchSummary,
}

/// Use case for enriching one batch of emails into an output table
pub struct EnrichUseCase {
    lookup: Arc<dyn LookupPort>,
    limiter: ConcurrencyLimiter,
    progress: Option<Box<dyn ProgressPort>>,
}

impl EnrichUseCase {
    pub fn new(lookup: Arc<dyn LookupPort>, max_concurrency: Option<usize>) -> Self {
        Self {
            lookup,
            limiter: ConcurrencyLimiter::new(max_concurrency),
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: Box<dyn ProgressPort>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Enrich `emails` and flatten the results. Never fails: lookup faults
    /// become rows with only the email filled in.
    pub async fn run(&self, emails: Vec<String>) -> OutputTable {
        self.run_batch(emails).await.table
    }

    /// Like [`run`](Self::run), keeping the raw records and the summary as well
    #[instrument(skip_all, fields(total = emails.len()))]
    pub async fn run_batch(&self, emails: Vec<String>) -> BatchOutput {
        let started = Instant::now();
        Metrics::histogram(MetricName::BatchSize).record(emails.len() as f64);

        let records = enrich_all(
            self.lookup.clone(),
            emails,
            &self.limiter,
            self.progress.as_deref(),
        )
        .await;
        let table = OutputTable::from_records(&records);
        let summary = BatchSummary::from_records(&records);

        Metrics::histogram(MetricName::BatchDuration).record(started.elapsed().as_secs_f64());
        info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Enrichment batch finished in {:.2}s",
            started.elapsed().as_secs_f64()
        );
        log_preview(&table);

        BatchOutput { records, table, summary }
    }

    /// Source to sinks: read the emails, enrich them, optionally dump the raw
    /// responses, then write the table. Only boundary I/O can fail.
    pub async fn run_to_sinks(
        &self,
        source: &dyn EmailSourcePort,
        table_sink: &dyn TableSinkPort,
        raw_sink: Option<&dyn RawRecordSinkPort>,
    ) -> Result<BatchSummary> {
        let emails = source.read_emails().await?;
        let output = self.run_batch(emails).await;

        if let Some(raw_sink) = raw_sink {
            raw_sink.write_records(&output.records).await?;
        }
        table_sink.write_table(&output.table).await?;
        Ok(output.summary)
    }
}

fn log_preview(table: &OutputTable) {
    for row in table.rows.iter().take(PREVIEW_ROWS) {
        let populated: Vec<String> = row
            .iter()
            .skip(1)
            .filter(|(_, value)| !value.is_null())
            .map(|(column, value)| format!("{}={}", column, render_cell(value)))
            .collect();
        debug!("Row preview {}: [{}]", row.email(), populated.join(", "));
    }
}
