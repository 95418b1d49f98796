// Transcription intake configuration
//
// This module contains configuration structures and constants for the intake
// service. Values come from environment variables with defaults, optionally
// seeded from a TOML configuration file (see config_loader).

use std::env;
use std::time::Duration;

/// Default values for configuration
pub mod defaults {
    // Listen address for the HTTP server
    pub const HOST: &str = "127.0.0.1";

    // Listen port for the HTTP server
    pub const PORT: u16 = 8000;

    // Client disconnect timeout in seconds
    pub const TIMEOUT_SECONDS: u64 = 60;

    // HTTP keep-alive in seconds
    pub const KEEPALIVE_SECONDS: u64 = 75;

    // Shared storage directory for uploaded media, must be reachable by the
    // transcription workers
    pub const UPLOAD_DIR: &str = "/app/shared/audio";

    // Job store connection target
    pub const REDIS_HOST: &str = "127.0.0.1";
    pub const REDIS_PORT: u16 = 6379;

    // Metrics backend ("statsd" or "none")
    pub const METRICS_BACKEND: &str = "none";
}

/// Configuration for the HTTP server itself
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listen address
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Client disconnect timeout
    pub client_timeout: Duration,
    /// Keep-alive duration for idle connections
    pub keep_alive: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: env::var("INTAKE_HOST").unwrap_or_else(|_| String::from(defaults::HOST)),
            port: env::var("INTAKE_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::PORT),
            client_timeout: Duration::from_secs(
                env::var("INTAKE_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults::TIMEOUT_SECONDS),
            ),
            keep_alive: Duration::from_secs(
                env::var("INTAKE_KEEPALIVE")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults::KEEPALIVE_SECONDS),
            ),
        }
    }
}

/// Configuration for the upload intake handlers
#[derive(Clone, Debug)]
pub struct IntakeConfig {
    /// Directory uploaded media is persisted to
    pub upload_dir: String,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            upload_dir: env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| String::from(defaults::UPLOAD_DIR)),
        }
    }
}

impl IntakeConfig {
    /// Ensures the upload directory exists
    pub fn ensure_upload_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.upload_dir)
    }
}

/// Connection target for the shared job store
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Store host
    pub host: String,
    /// Store port
    pub port: u16,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: env::var("REDIS_HOST").unwrap_or_else(|_| String::from(defaults::REDIS_HOST)),
            port: env::var("REDIS_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::REDIS_PORT),
        }
    }
}

impl StoreConfig {
    /// Connection URL for the store client
    pub fn url(&self) -> String {
        format!("redis://{}:{}/", self.host, self.port)
    }
}

/// Configuration for metrics collection and export
#[derive(Clone, Debug)]
pub struct MetricsConfig {
    /// Type of metrics exporter ("statsd", "none")
    pub backend: String,
    /// Endpoint for the exporter (if applicable)
    pub endpoint: Option<String>,
    /// Prefix prepended to all metric names
    pub prefix: Option<String>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            backend: env::var("INTAKE_METRICS_BACKEND")
                .or_else(|_| env::var("METRICS_BACKEND"))
                .unwrap_or_else(|_| String::from(defaults::METRICS_BACKEND)),
            endpoint: env::var("METRICS_ENDPOINT")
                .or_else(|_| env::var("STATSD_ENDPOINT"))
                .ok(),
            prefix: env::var("METRICS_PREFIX").ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_url_includes_host_and_port() {
        let config = StoreConfig {
            host: String::from("redis.internal"),
            port: 6380,
        };
        assert_eq!(config.url(), "redis://redis.internal:6380/");
    }
}
