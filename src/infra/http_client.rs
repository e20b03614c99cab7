use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::app::ports::LookupPort;
use crate::common::constants::{API_KEY_QUERY_PARAM, EMAIL_QUERY_PARAM};
use crate::common::error::Result;
use crate::common::types::{LookupFailure, LookupOutcome};
use crate::config::Config;
use crate::metrics::{MetricName, Metrics};

/// ReverseContact lookup over a single shared `reqwest::Client`.
///
/// The client is built once and holds the connection pool every concurrent
/// lookup draws from; wrap the adapter in an `Arc` to share it.
pub struct ReqwestLookup {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl ReqwestLookup {
    pub fn new(api_url: &str, api_key: &str, timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.api_url,
            config.require_api_key()?,
            Duration::from_secs(config.timeout_seconds),
            &config.user_agent,
        )
    }

    async fn fetch(&self, email: &str) -> LookupOutcome {
        let resp = match self
            .client
            .get(&self.api_url)
            .query(&[(EMAIL_QUERY_PARAM, email), (API_KEY_QUERY_PARAM, self.api_key.as_str())])
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => return LookupOutcome::Failure(transport_failure(e)),
        };

        let status = resp.status();
        if status != StatusCode::OK {
            return LookupOutcome::Failure(LookupFailure::Status(status.as_u16()));
        }

        let bytes = match resp.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return LookupOutcome::Failure(transport_failure(e)),
        };
        match serde_json::from_slice(&bytes) {
            Ok(payload) => LookupOutcome::Success(payload),
            Err(e) => LookupOutcome::Failure(LookupFailure::Parse(e.to_string())),
        }
    }
}

// The request URL carries the API key, so it is stripped from the message
fn transport_failure(e: reqwest::Error) -> LookupFailure {
    let kind = if e.is_timeout() { "timed out: " } else { "" };
    LookupFailure::Transport(format!("{}{}", kind, e.without_url()))
}

#[async_trait]
impl LookupPort for ReqwestLookup {
    async fn lookup(&self, email: &str) -> LookupOutcome {
        let started = Instant::now();
        let outcome = self.fetch(email).await;
        Metrics::histogram(MetricName::LookupDuration).record(started.elapsed().as_secs_f64());

        match &outcome {
            LookupOutcome::Success(_) => {
                debug!("Lookup succeeded for {}", email);
                Metrics::counter(MetricName::LookupsSuccess).increment(1);
            }
            LookupOutcome::Failure(reason) => {
                warn!("Lookup failed for {}: {}", email, reason);
                Metrics::counter_with_reason(MetricName::LookupsFailure, reason.kind()).increment(1);
            }
        }
        outcome
    }
}
