use std::io;

use configs::LogFormat;
use tracing_subscriber::{fmt, EnvFilter};

/// Build the filter used by every initializer.
/// - Respects `RUST_LOG` if set
/// - Otherwise applies `level` to the app and to tower_http request spans
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},tower_http={level},axum={level}")))
}

/// Initialize tracing with the configured level and output format.
/// Writes to stdout; a second call is a no-op.
pub fn init_logging(level: &str, format: LogFormat) {
    match format {
        LogFormat::Compact => {
            let _ = fmt()
                .with_env_filter(env_filter(level))
                .with_target(false)
                .compact()
                .with_writer(io::stdout)
                .try_init();
        }
        LogFormat::Json => {
            let _ = fmt()
                .with_env_filter(env_filter(level))
                .with_target(false)
                .json()
                .with_writer(io::stdout)
                .try_init();
        }
    }
}

/// Compact `info` logging, for tools and tests that have no config at hand.
pub fn init_logging_default() {
    init_logging("info", LogFormat::Compact);
}
