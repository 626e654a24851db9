use tracing_subscriber::{
    layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter,
};

/// Install the global tracing subscriber.
///
/// Hosts call this once at startup with `settings.logging.filter`, as the
/// `reminder-timer` binary does.
///
/// `RUST_LOG` wins over `default_filter`. Fails, without panicking, when a
/// global subscriber is already installed.
pub fn init_tracing(default_filter: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}
