use std::mem;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

use crate::app::ports::{LookupPort, ProgressPort};
use crate::common::types::{EnrichedRecord, LookupFailure, LookupOutcome};
use crate::pipeline::ingestion::rate_limiter::ConcurrencyLimiter;

/// Owns the email of one spawned lookup and the sender its record goes out on.
///
/// A slot always produces exactly one record: either through [`complete`]
/// or, if the task unwinds or is dropped first, an `Aborted` failure from `Drop`.
///
/// [`complete`]: CompletionSlot::complete
struct CompletionSlot {
    email: String,
    tx: Option<mpsc::UnboundedSender<EnrichedRecord>>,
}

impl CompletionSlot {
    fn new(email: String, tx: mpsc::UnboundedSender<EnrichedRecord>) -> Self {
        Self { email, tx: Some(tx) }
    }

    fn complete(mut self, outcome: LookupOutcome) {
        self.send(outcome);
    }

    fn send(&mut self, outcome: LookupOutcome) {
        if let Some(tx) = self.tx.take() {
            // The receiver only goes away once every slot has reported
            let _ = tx.send(EnrichedRecord::new(mem::take(&mut self.email), outcome));
        }
    }
}

impl Drop for CompletionSlot {
    fn drop(&mut self) {
        if self.tx.is_some() {
            self.send(LookupOutcome::Failure(LookupFailure::Aborted(
                "task ended before reporting an outcome".to_string(),
            )));
        }
    }
}

/// Look up every email concurrently and return one record per email in the
/// order the lookups finished.
///
/// Each email gets its own task immediately; `limiter` decides how many of
/// them may be talking to the API at once. A failing or panicking lookup only
/// affects its own record.
#[instrument(skip_all, fields(total = emails.len(), max_concurrency = ?limiter.limit()))]
pub async fn enrich_all(
    lookup: Arc<dyn LookupPort>,
    emails: Vec<String>,
    limiter: &ConcurrencyLimiter,
    progress: Option<&dyn ProgressPort>,
) -> Vec<EnrichedRecord> {
    let total = emails.len();
    if total == 0 {
        return Vec::new();
    }

    let (tx, mut rx) = mpsc::unbounded_channel::<EnrichedRecord>();
    for email in emails {
        let slot = CompletionSlot::new(email, tx.clone());
        let lookup = lookup.clone();
        let limiter = limiter.clone();
        tokio::spawn(async move {
            let _permit = limiter.acquire().await;
            let outcome = lookup.lookup(&slot.email).await;
            slot.complete(outcome);
        });
    }
    // Only the spawned slots hold senders now; the loop ends when the last one reports
    drop(tx);

    let mut records = Vec::with_capacity(total);
    while let Some(record) = rx.recv().await {
        debug!(
            email = %record.email,
            success = record.outcome.is_success(),
            "Lookup completed"
        );
        records.push(record);
        if let Some(progress) = progress {
            progress.on_progress(records.len(), total);
        }
    }

    info!("Collected {}/{} lookup results", records.len(), total);
    records
}
