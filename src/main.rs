use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use contact_enricher::app::enrich_use_case::EnrichUseCase;
use contact_enricher::app::ports::RawRecordSinkPort;
use contact_enricher::common::constants::{DEFAULT_LOG_DIR, ENV_METRICS_ADDR};
use contact_enricher::config::Config;
use contact_enricher::infra::{derive_output_path, CsvEmailSource, CsvTableSink, LogProgress, RawJsonSink, ReqwestLookup};
use contact_enricher::{logging, metrics};

#[derive(Parser)]
#[command(name = "contact_enricher")]
#[command(about = "Enrich a CSV of email addresses through the ReverseContact API")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./enricher.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for the daily JSON log file
    #[arg(long, global = true, default_value = DEFAULT_LOG_DIR)]
    log_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up every email in a CSV file and write a flattened results CSV
    Enrich {
        /// Input CSV with an `email` column
        #[arg(long)]
        input: PathBuf,
        /// Output CSV (default: <input name>_results.csv)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Also write the raw API responses as JSON
        #[arg(long)]
        raw_json: Option<PathBuf>,
        /// Maximum lookups in flight (default: unbounded)
        #[arg(long)]
        max_concurrency: Option<usize>,
        /// Per-request timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Override the enrichment endpoint
        #[arg(long)]
        api_url: Option<String>,
        /// Serve Prometheus metrics on this address (host:port)
        #[arg(long)]
        metrics_addr: Option<String>,
    },
}

async fn run_enrich(
    config: Config,
    input: &Path,
    output: Option<PathBuf>,
    raw_json: Option<PathBuf>,
) -> anyhow::Result<()> {
    let lookup = Arc::new(ReqwestLookup::from_config(&config).context("Failed to build lookup client")?);
    let use_case = EnrichUseCase::new(lookup, config.max_concurrency)
        .with_progress(Box::new(LogProgress::new(config.progress_every)));

    let output_path = output.unwrap_or_else(|| derive_output_path(input));
    let source = CsvEmailSource::new(input);
    let table_sink = CsvTableSink::new(&output_path);
    let raw_sink = raw_json.map(RawJsonSink::new);

    let summary = use_case
        .run_to_sinks(&source, &table_sink, raw_sink.as_ref().map(|s| s as &dyn RawRecordSinkPort))
        .await
        .with_context(|| format!("Enrichment of {} failed", input.display()))?;

    info!(
        "Enriched {} emails ({} found, {} failed); results saved to {}",
        summary.total,
        summary.succeeded,
        summary.failed,
        output_path.display()
    );
    println!("Enriched data saved to {}", output_path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging; the guard flushes the file writer on exit
    let _log_guard = logging::init_logging(&cli.log_dir);

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.apply_env().context("Invalid environment configuration")?;

    match cli.command {
        Commands::Enrich {
            input,
            output,
            raw_json,
            max_concurrency,
            timeout_secs,
            api_url,
            metrics_addr,
        } => {
            if let Some(cap) = max_concurrency {
                config.max_concurrency = Some(cap);
            }
            if let Some(secs) = timeout_secs {
                config.timeout_seconds = secs;
            }
            if let Some(url) = api_url {
                config.api_url = url;
            }
            config.validate()?;

            if let Some(addr) = metrics_addr.or_else(|| std::env::var(ENV_METRICS_ADDR).ok()) {
                metrics::init_metrics(&addr);
            }

            info!(
                input = %input.display(),
                max_concurrency = ?config.max_concurrency,
                "Starting enrichment"
            );
            if let Err(e) = run_enrich(config, &input, output, raw_json).await {
                error!("{:#}", e);
                return Err(e);
            }
        }
    }
    Ok(())
}
