//! Tracing setup.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` controls the filter (default `info`); set
/// `REELSCORE_LOG_JSON=true` for JSON output in log aggregators.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var("REELSCORE_LOG_JSON")
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(false);

    if json {
        fmt().with_env_filter(filter).json().init();
    } else {
        fmt().with_env_filter(filter).init();
    }
}
