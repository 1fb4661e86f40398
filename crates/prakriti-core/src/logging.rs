use tracing_subscriber::EnvFilter;

/// Install a stderr `tracing` subscriber; `RUST_LOG` overrides `default_filter`.
///
/// Stdout is left untouched so binaries can reserve it for their results.
pub fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
