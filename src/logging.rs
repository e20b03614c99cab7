use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::common::constants::LOG_FILE_PREFIX;

/// Initializes logging with console output and a daily JSON log file under `log_dir`.
///
/// Keep the returned guard alive until exit so buffered file lines are flushed.
pub fn init_logging(log_dir: &Path) -> Option<WorkerGuard> {
    // Console layer is always on; the file layer is skipped if the directory can't be made
    let console_layer = fmt::layer().with_target(true).with_writer(std::io::stdout);

    // Respect RUST_LOG if set; otherwise info for this crate and warnings from dependencies
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("contact_enricher=info,warn"));

    let (file_layer, guard) = match fs::create_dir_all(log_dir) {
        Ok(()) => {
            let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
            let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);
            (Some(fmt::layer().json().with_writer(non_blocking_writer)), Some(guard))
        }
        Err(_) => (None, None),
    };

    // try_init so a second call (tests, embedding) is harmless
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init();

    guard
}
