pub mod app;
pub mod common;
pub mod config;
pub mod infra;
pub mod logging;
pub mod metrics;
pub mod pipeline;

pub use app::enrich_use_case::{BatchOutput, BatchSummary, EnrichUseCase};
pub use common::{EnrichedRecord, EnricherError, LookupFailure, LookupOutcome, Result};
pub use config::Config;
pub use pipeline::{enrich_all, flatten, FlatRow, OutputTable};
