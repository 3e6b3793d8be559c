//! Server configuration from environment variables.
//!
//! HOST (default 0.0.0.0), PORT (8080), RESULTS_PATH (results.csv) and INACTIVITY_HOURS (12).
//! Missing or unparsable values fall back to the defaults.

use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// CSV file that finished rankings are appended to.
    pub results_path: PathBuf,
    /// Tournaments not touched for this long are dropped from memory.
    pub inactivity_timeout: Duration,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_results_path() -> PathBuf {
    PathBuf::from("results.csv")
}

fn default_inactivity_hours() -> u64 {
    12
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            results_path: default_results_path(),
            inactivity_timeout: Duration::from_secs(default_inactivity_hours() * 3600),
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup (the environment, or a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(default_host);
        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or_else(default_port);
        let results_path = lookup("RESULTS_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_results_path);
        let timeout_secs = lookup("INACTIVITY_HOURS")
            .and_then(|h| h.parse::<u64>().ok())
            .filter(|h| *h > 0)
            .and_then(|h| h.checked_mul(3600))
            .unwrap_or(default_inactivity_hours() * 3600);
        Self {
            host,
            port,
            results_path,
            inactivity_timeout: Duration::from_secs(timeout_secs),
        }
    }
}
