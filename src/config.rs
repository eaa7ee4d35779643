//! Runtime configuration for the web orchestrator, read from the environment.

use std::path::PathBuf;
use std::time::Duration;

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_stage_ttl_hours() -> u64 {
    12
}

/// Server settings. Env: HOST, PORT, DATA_DIR, STAGE_TTL_HOURS.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Root of the JSON document store.
    pub data_dir: PathBuf,
    /// Stages not touched for this long are dropped.
    pub stage_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_dir: default_data_dir(),
            stage_ttl: Duration::from_secs(default_stage_ttl_hours() * 3600),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Missing, unparsable, or out-of-range values fall back to
    /// defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(default_host);
        let port = lookup("PORT")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or_else(default_port);
        let data_dir = lookup("DATA_DIR")
            .filter(|d| !d.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);
        let stage_ttl = lookup("STAGE_TTL_HOURS")
            .and_then(|h| h.trim().parse::<u64>().ok())
            .and_then(|hours| hours.checked_mul(3600))
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(default_stage_ttl_hours() * 3600));
        Self {
            host,
            port,
            data_dir,
            stage_ttl,
        }
    }
}
