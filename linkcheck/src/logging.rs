//! Development-time tracing, separate from product output.
//!
//! Progress and skip warnings go through `tracing` to stderr under
//! `RUST_LOG`; the summary lines and the report file are the product
//! output and are always produced.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing subscriber. Reads `RUST_LOG`, defaults to `warn`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
