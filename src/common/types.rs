use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Why a single lookup produced no payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupFailure {
    /// Connection, DNS, timeout or body-read fault
    #[error("transport error: {0}")]
    Transport(String),

    /// The API answered with something other than 200
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// 200 response whose body is not valid JSON
    #[error("invalid JSON body: {0}")]
    Parse(String),

    /// The lookup task ended without reporting an outcome
    #[error("lookup task aborted: {0}")]
    Aborted(String),
}

impl LookupFailure {
    /// Short label used for metrics and structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            LookupFailure::Transport(_) => "transport",
            LookupFailure::Status(_) => "status",
            LookupFailure::Parse(_) => "parse",
            LookupFailure::Aborted(_) => "aborted",
        }
    }
}

/// Result of looking up one email against the enrichment API.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Success(Value),
    Failure(LookupFailure),
}

impl LookupOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, LookupOutcome::Success(_))
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            LookupOutcome::Success(value) => Some(value),
            LookupOutcome::Failure(_) => None,
        }
    }
}

/// An email paired with the outcome of its own lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub email: String,
    pub outcome: LookupOutcome,
}

impl EnrichedRecord {
    pub fn new(email: impl Into<String>, outcome: LookupOutcome) -> Self {
        Self {
            email: email.into(),
            outcome,
        }
    }

    /// Borrowed view in the `{"email", "api_data"}` dump shape
    pub fn as_raw(&self) -> RawRecord<'_> {
        RawRecord {
            email: &self.email,
            api_data: self.outcome.payload(),
        }
    }
}

/// Serialized form of an [`EnrichedRecord`]; `api_data` is `null` on failure.
#[derive(Debug, Serialize)]
pub struct RawRecord<'a> {
    pub email: &'a str,
    pub api_data: Option<&'a Value>,
}
