//! Tracing subscriber setup.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::service::DEFAULT_LOG_FILTER;

/// Build the filter from a directive string, falling back to the default
pub fn build_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|e| {
        eprintln!(
            "Invalid log filter '{}': {}, using '{}'",
            directives, e, DEFAULT_LOG_FILTER
        );
        EnvFilter::new(DEFAULT_LOG_FILTER)
    })
}

/// Install the global subscriber
pub fn init_tracing(directives: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_level(true),
        )
        .with(build_filter(directives))
        .init();
}
