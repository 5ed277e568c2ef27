//! Log output setup.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info,reqwest=warn,hyper=warn";

/// Installs a global `tracing` subscriber that prints to stderr.
///
/// Filtering follows `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
/// Calling it a second time does nothing.
///
/// ```no_run
/// shiritori::logging::init();
/// tracing::info!("console starting");
/// ```
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();

    if installed.is_ok() {
        tracing::debug!("logging initialized");
    }
}
