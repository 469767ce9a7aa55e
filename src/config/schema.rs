//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the host.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the task service host.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address, connection limit).
    pub listener: ListenerConfig,

    /// Timeout configuration, including the shutdown grace period.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_connections: 10_000,
        }
    }
}

/// Timeout configuration for connections and shutdown.
///
/// Read and write timeouts bound how long a single request connection may
/// stay active; the idle timeout bounds a kept-alive connection with no
/// request in flight; the grace period bounds the drain wait at shutdown.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request body read timeout in seconds.
    pub read_secs: u64,

    /// Response write timeout in seconds.
    pub write_secs: u64,

    /// Idle (keep-alive) connection timeout in seconds.
    pub idle_secs: u64,

    /// Shutdown grace period in seconds.
    pub shutdown_grace_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            read_secs: 5,
            write_secs: 10,
            idle_secs: 120,
            shutdown_grace_secs: 10,
        }
    }
}

impl TimeoutConfig {
    /// Request body read timeout.
    pub fn read(&self) -> Duration {
        Duration::from_secs(self.read_secs)
    }

    /// Response write timeout.
    pub fn write(&self) -> Duration {
        Duration::from_secs(self.write_secs)
    }

    /// Idle connection timeout.
    pub fn idle(&self) -> Duration {
        Duration::from_secs(self.idle_secs)
    }

    /// Shutdown grace period.
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_expected_constants() {
        let config = ServerConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.listener.max_connections, 10_000);
        assert_eq!(config.timeouts.read(), Duration::from_secs(5));
        assert_eq!(config.timeouts.write(), Duration::from_secs(10));
        assert_eq!(config.timeouts.idle(), Duration::from_secs(120));
        assert_eq!(config.timeouts.shutdown_grace(), Duration::from_secs(10));
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn partial_toml_fills_remaining_fields_with_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:9090"

            [timeouts]
            shutdown_grace_secs = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:9090");
        assert_eq!(config.listener.max_connections, 10_000);
        assert_eq!(config.timeouts.shutdown_grace_secs, 3);
        assert_eq!(config.timeouts.read_secs, 5);
    }

    #[test]
    fn empty_toml_is_a_valid_config() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }
}
