use tracing_subscriber::EnvFilter;

/// Log to stderr, filtered by `RUST_LOG` (default `kiri_core=info,kiri_cli=info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("kiri_core=info,kiri_cli=info"));
    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_env_filter(filter)
        .try_init();
}
