use tracing::info;

use crate::app::ports::ProgressPort;

/// Progress through `tracing`: one line every `every` records and one at the end.
pub struct LogProgress {
    every: usize,
}

impl LogProgress {
    pub fn new(every: usize) -> Self {
        Self { every: every.max(1) }
    }

    fn should_log(&self, completed: usize, total: usize) -> bool {
        completed == total || completed % self.every == 0
    }
}

impl ProgressPort for LogProgress {
    fn on_progress(&self, completed: usize, total: usize) {
        if self.should_log(completed, total) {
            let pct = if total == 0 { 100.0 } else { completed as f64 * 100.0 / total as f64 };
            info!("Enriching emails: {}/{} ({:.0}%)", completed, total, pct);
        }
    }
}
