// Enrichment pipeline: concurrent lookups (ingestion) and row shaping (processing)

pub mod ingestion;
pub mod processing;

// Re-export the two stage entry points
pub use ingestion::scheduler::enrich_all;
pub use processing::flatten::{flatten, FlatRow, OutputTable};
