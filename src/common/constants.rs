//! Constants shared between the CLI, configuration and the adapters.

// Enrichment API
pub const DEFAULT_API_URL: &str = "https://api.reversecontact.com/enrichment";
pub const EMAIL_QUERY_PARAM: &str = "email";
pub const API_KEY_QUERY_PARAM: &str = "apikey";
pub const DEFAULT_USER_AGENT: &str = concat!("contact_enricher/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

// Environment variables (also read from .env)
pub const ENV_API_KEY: &str = "ENRICHER_API_KEY";
pub const ENV_API_URL: &str = "ENRICHER_API_URL";
pub const ENV_MAX_CONCURRENCY: &str = "ENRICHER_MAX_CONCURRENCY";
pub const ENV_METRICS_ADDR: &str = "ENRICHER_METRICS_ADDR";

// Files
pub const DEFAULT_CONFIG_FILE: &str = "enricher.toml";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const LOG_FILE_PREFIX: &str = "enricher.log";
pub const RESULTS_SUFFIX: &str = "_results.csv";

// Table layout
pub const EMAIL_COLUMN: &str = "email";
pub const PERSON_KEY: &str = "person";
pub const COMPANY_KEY: &str = "company";

/// Log progress every N completed lookups unless configured otherwise
pub const DEFAULT_PROGRESS_EVERY: usize = 25;

/// Number of rows logged as a preview after flattening
pub const PREVIEW_ROWS: usize = 5;
