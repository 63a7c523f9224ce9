use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set; keeps a successful run silent
pub const DEFAULT_FILTER: &str = "warn";

/// Initialize stderr logging, honouring `RUST_LOG`.
///
/// Calling it again after a subscriber is installed is harmless.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let result = fmt::Subscriber::builder()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .try_init();

    if let Err(e) = result {
        // a subscriber is already installed, usually by a test harness
        tracing::debug!("Logger already initialized: {}", e);
        return;
    }

    tracing::debug!("resub v{} logging initialized", crate::version());
}
