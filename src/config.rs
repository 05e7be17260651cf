//! Configuration management for the PDF split server

use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory holding one subdirectory per request identifier.
    pub root: PathBuf,
    /// How long an artifact set is kept before the sweeper may delete it.
    pub retention: Duration,
    /// How often the sweeper scans for expired artifact sets.
    pub sweep_interval: Duration,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Total timeout for downloading the source PDF.
    pub timeout: Duration,
    /// Maximum accepted size of a downloaded PDF, in bytes.
    pub max_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            storage: StorageConfig {
                root: PathBuf::from("storage"),
                retention: Duration::from_secs(3600),
                sweep_interval: Duration::from_secs(60),
            },
            fetch: FetchConfig {
                timeout: Duration::from_secs(60),
                max_bytes: 100 * 1024 * 1024,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("PORT", 8000),
            },
            storage: StorageConfig {
                root: env::var("PDF_STORAGE_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("storage")),
                retention: Duration::from_secs(parse_var("PDF_CLEANUP_SECONDS", 3600)),
                sweep_interval: Duration::from_secs(parse_var(
                    "PDF_SWEEP_INTERVAL_SECONDS",
                    60,
                )),
            },
            fetch: FetchConfig {
                timeout: Duration::from_secs(parse_var("PDF_FETCH_TIMEOUT_SECONDS", 60)),
                max_bytes: parse_var("PDF_MAX_FETCH_BYTES", 100 * 1024 * 1024),
            },
        }
    }
}

/// Read an integer environment variable, falling back to a default on
/// absence or a malformed value (logged at warn).
fn parse_var<T: std::str::FromStr + Copy + std::fmt::Display>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid value for {}: {:?}, using default {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.storage.retention, Duration::from_secs(3600));
        assert_eq!(config.storage.root, PathBuf::from("storage"));
        assert_eq!(config.fetch.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_parse_var_fallback() {
        // Variable absent: default wins
        assert_eq!(parse_var("PDF_SPLIT_TEST_UNSET_VAR", 42u64), 42);
    }
}
