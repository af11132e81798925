use std::sync::Once;
use tracing::Subscriber;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

pub fn get_subscriber(env_filter: String, json: bool) -> impl Subscriber + Send + Sync {
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));

    let fmt_layer = if json {
        fmt::layer().with_target(false).json().boxed()
    } else {
        fmt::layer().with_target(false).boxed()
    };

    Registry::default().with(filter_layer).with(fmt_layer)
}

static TRACING: Once = Once::new();

/// Installs the global subscriber; later calls are no-ops.
pub fn init_subscriber(env_filter: String, json: bool) {
    TRACING.call_once(|| {
        // another subscriber may already be installed (e.g. by a test harness)
        let _ = get_subscriber(env_filter, json).try_init();
    });
}
