//! Logging initialization for the `tally` binary
//!
//! Diagnostics go to stderr so they never mix with results on stdout.
//! `RUST_LOG` overrides the level given on the command line.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_logging(level: &str) -> anyhow::Result<()> {
    let env_filter = build_env_filter(level);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))
}

fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tally={level},tally_engine={level},tally_units={level}")))
}
