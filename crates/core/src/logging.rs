//! Tracing subscriber setup

use std::sync::Once;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Install the global `tracing` subscriber
///
/// `RUST_LOG` wins over `default_filter`. Safe to call more than once; only
/// the first call installs anything, and an already-installed foreign
/// subscriber is left alone.
pub fn init(default_filter: &str) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init();
    });
}

/// Install the subscriber using the filter from [`crate::config::Config`]
pub fn init_from_config(config: &crate::config::Config) {
    init(&config.log_filter);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init("promptdeck_core=debug");
        init("promptdeck_core=trace");
        tracing::debug!("logging initialised twice without panicking");
    }
}
