use tracing_subscriber::EnvFilter;

/// Install a test-friendly subscriber. Safe to call from every test.
///
/// Filtering follows `RUST_LOG`; nothing is printed when it is unset.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .pretty()
        .try_init();
}

