use serde::{Deserialize, Serialize};

/// Default number of records kept per email in each history collection.
pub const DEFAULT_HISTORY_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address
    pub bind_addr: String,
    /// SQLite connection string, e.g. `sqlite://data/repo_history.db`
    pub database_url: String,
    /// Maximum pooled database connections
    pub max_db_connections: u32,
    /// Upstream search API configuration
    pub github: GithubConfig,
    /// Records kept per email in each history collection
    pub history_limit: usize,
}

/// Configuration for the upstream repository search API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Base URL of the API, without trailing slash.
    pub base_url: String,
    /// Optional personal access token, sent as a bearer token.
    pub token: Option<String>,
    /// Request timeout in seconds (capped at 60).
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
            database_url: "sqlite://data/repo_history.db".to_string(),
            max_db_connections: 5,
            github: GithubConfig::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.github.com".to_string(),
            token: None,
            timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source. `from_env` is this
    /// with the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = lookup("REPO_HISTORY_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(port) = lookup("PORT") {
            if let Ok(port) = port.parse::<u16>() {
                config.bind_addr = with_port(&config.bind_addr, port);
            }
        }
        if let Some(url) = lookup("DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(val) = lookup("REPO_HISTORY_MAX_DB_CONNECTIONS") {
            if let Ok(v) = val.parse::<u32>() {
                config.max_db_connections = v.max(1);
            }
        }
        if let Some(val) = lookup("REPO_HISTORY_LIMIT") {
            if let Ok(v) = val.parse::<usize>() {
                config.history_limit = v.max(1);
            }
        }

        if let Some(url) = lookup("GITHUB_API_URL") {
            config.github.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(token) = lookup("GITHUB_TOKEN") {
            if !token.is_empty() {
                config.github.token = Some(token);
            }
        }
        if let Some(val) = lookup("GITHUB_TIMEOUT_SECS") {
            if let Ok(v) = val.parse::<u64>() {
                config.github.timeout_secs = v.clamp(1, 60);
            }
        }

        config
    }
}

/// Replace the port of a `host:port` address, keeping the host.
fn with_port(addr: &str, port: u16) -> String {
    let host = addr.rsplit_once(':').map(|(h, _)| h).unwrap_or(addr);
    format!("{host}:{port}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_env() {
        let config = config_from(&[]);
        assert_eq!(config.bind_addr, "0.0.0.0:5000");
        assert_eq!(config.history_limit, 5);
        assert_eq!(config.github.timeout_secs, 10);
        assert!(config.github.token.is_none());
    }

    #[test]
    fn test_port_overrides_bind_port_only() {
        let config = config_from(&[("REPO_HISTORY_BIND_ADDR", "127.0.0.1:9000"), ("PORT", "8080")]);
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
    }

    #[test]
    fn test_invalid_numbers_keep_defaults() {
        let config = config_from(&[("REPO_HISTORY_LIMIT", "lots"), ("GITHUB_TIMEOUT_SECS", "-3")]);
        assert_eq!(config.history_limit, DEFAULT_HISTORY_LIMIT);
        assert_eq!(config.github.timeout_secs, 10);
    }

    #[test]
    fn test_timeout_is_capped() {
        let config = config_from(&[("GITHUB_TIMEOUT_SECS", "600")]);
        assert_eq!(config.github.timeout_secs, 60);
    }

    #[test]
    fn test_github_url_trailing_slash_trimmed() {
        let config = config_from(&[("GITHUB_API_URL", "http://localhost:1234/")]);
        assert_eq!(config.github.base_url, "http://localhost:1234");
    }
}
