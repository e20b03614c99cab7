// Pipeline ingestion: fan-out of lookups, fan-in of completed records, concurrency limiting

pub mod rate_limiter;
pub mod scheduler;

pub use rate_limiter::ConcurrencyLimiter;
