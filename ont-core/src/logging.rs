use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global fmt subscriber on stderr.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` is used. Stdout stays
/// free for the operator-facing progress lines.
pub fn init_tracing(default_filter: &str) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {}", e))
}
