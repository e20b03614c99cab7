//! Metrics for the enrichment run.
//!
//! Names live in [`MetricName`] so call sites never spell a metric by hand.
//! Recording is always on; an exporter is only installed when an address is
//! configured, otherwise the `metrics` macros are no-ops.

use std::fmt;
use std::net::SocketAddr;

use tracing::{info, warn};

/// Every metric the enricher records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    LookupsSuccess,
    LookupsFailure,
    LookupDuration,
    BatchSize,
    BatchDuration,
    RowsWritten,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::LookupsSuccess => "enricher_lookups_success_total",
            MetricName::LookupsFailure => "enricher_lookups_failure_total",
            MetricName::LookupDuration => "enricher_lookup_duration_seconds",
            MetricName::BatchSize => "enricher_batch_size",
            MetricName::BatchDuration => "enricher_batch_duration_seconds",
            MetricName::RowsWritten => "enricher_rows_written_total",
        }
    }

    pub fn all() -> &'static [MetricName] {
        &[
            MetricName::LookupsSuccess,
            MetricName::LookupsFailure,
            MetricName::LookupDuration,
            MetricName::BatchSize,
            MetricName::BatchDuration,
            MetricName::RowsWritten,
        ]
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Thin handle factory over the `metrics` macros
pub struct Metrics;

impl Metrics {
    pub fn counter(name: MetricName) -> ::metrics::Counter {
        ::metrics::counter!(name.as_str())
    }

    pub fn counter_with_reason(name: MetricName, reason: &'static str) -> ::metrics::Counter {
        ::metrics::counter!(name.as_str(), "reason" => reason)
    }

    pub fn histogram(name: MetricName) -> ::metrics::Histogram {
        ::metrics::histogram!(name.as_str())
    }
}

/// Install the Prometheus exporter on `addr` ("host:port").
/// A bad address or a failed install is logged and otherwise ignored.
pub fn init_metrics(addr: &str) {
    let addr: SocketAddr = match addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics addr '{}': {}", addr, e);
            return;
        }
    };
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => {
            info!("Prometheus exporter listening on http://{}/metrics", addr);
        }
        Err(e) => {
            warn!("Prometheus exporter install failed (possibly already installed): {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_metric_names_are_unique_and_prefixed() {
        let names: HashSet<&str> = MetricName::all().iter().map(MetricName::as_str).collect();
        assert_eq!(names.len(), MetricName::all().len());
        assert!(names.iter().all(|n| n.starts_with("enricher_")));
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(MetricName::RowsWritten.to_string(), "enricher_rows_written_total");
    }
}
