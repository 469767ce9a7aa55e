//! Structured logging.
//!
//! # Responsibilities
//! - Build and install the tracing subscriber
//! - Apply the configured level, overridable via RUST_LOG
//!
//! # Design Decisions
//! - Explicitly constructed by the caller; components only emit through the
//!   `tracing` facade, so tests can capture events with a scoped subscriber

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ObservabilityConfig;

/// Install the global tracing subscriber.
///
/// Call once, from the binary, before the server starts. `RUST_LOG` takes
/// precedence over the configured level.
pub fn init(config: &ObservabilityConfig) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "taskd={level},tower_http={level}",
                    level = config.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
