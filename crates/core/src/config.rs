//! Configuration management for the Pinecone client.
//!
//! This module handles loading and merging configuration from multiple sources,
//! lowest precedence first:
//! - Built-in defaults
//! - Config file (YAML, path from `PINECONE_CONFIG` or passed explicitly)
//! - Environment variables
//! - Command-line flags

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{PineconeError, PineconeResult};

/// API version sent with every data-plane request.
pub const DEFAULT_API_VERSION: &str = "2025-10";

/// Main client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API key sent as the `Api-Key` header
    pub api_key: Option<String>,

    /// Index data-plane host, always carrying a scheme once normalized
    pub host: String,

    /// Maximum number of concurrent per-namespace requests
    pub pool_threads: usize,

    /// Optional per-request timeout in seconds
    pub timeout_secs: Option<u64>,

    /// Value of the `X-Pinecone-Api-Version` header
    pub api_version: String,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    client: Option<ClientSection>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClientSection {
    api_key: Option<String>,
    host: Option<String>,
    pool_threads: Option<usize>,
    timeout_secs: Option<u64>,
    api_version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            host: String::new(),
            pool_threads: default_pool_threads(),
            timeout_secs: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            config_file: None,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

/// Five request slots per available CPU.
pub fn default_pool_threads() -> usize {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    5 * cpus
}

/// Prefix `https://` onto a host that carries no scheme.
///
/// An empty host stays empty so that `validate()` can report it.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    if host.is_empty() || host.starts_with("https://") || host.starts_with("http://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

impl ClientConfig {
    /// Load configuration from the environment and defaults.
    ///
    /// Environment variables:
    /// - `PINECONE_CONFIG`: Path to a YAML config file
    /// - `PINECONE_API_KEY`: API key
    /// - `PINECONE_INDEX_HOST`: Index host
    /// - `PINECONE_POOL_THREADS`: Concurrent request limit
    /// - `PINECONE_TIMEOUT_SECS`: Per-request timeout
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use pinecone_core::config::ClientConfig;
    ///
    /// let config = ClientConfig::load().expect("Failed to load config");
    /// println!("Host: {}", config.host);
    /// ```
    pub fn load() -> PineconeResult<Self> {
        let config_file = std::env::var("PINECONE_CONFIG").ok().map(PathBuf::from);
        Self::load_from(config_file)
    }

    /// Load configuration using an explicit config file path.
    pub fn load_from(config_file: Option<PathBuf>) -> PineconeResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_file {
            if !path.exists() {
                return Err(PineconeError::Config(format!(
                    "Config file does not exist: {:?}",
                    path
                )));
            }
            config = config.merge_yaml(&path)?;
            config.config_file = Some(path);
        }

        config.apply_env(|key| std::env::var(key).ok())
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> PineconeResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PineconeError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            PineconeError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(client) = config_file.client {
            if let Some(api_key) = client.api_key {
                result.api_key = Some(api_key);
            }
            if let Some(host) = client.host {
                result.host = normalize_host(&host);
            }
            if let Some(pool_threads) = client.pool_threads {
                result.pool_threads = pool_threads;
            }
            if let Some(timeout_secs) = client.timeout_secs {
                result.timeout_secs = Some(timeout_secs);
            }
            if let Some(api_version) = client.api_version {
                result.api_version = api_version;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply environment overrides read through `lookup`.
    fn apply_env<F>(mut self, lookup: F) -> PineconeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup("PINECONE_API_KEY") {
            self.api_key = Some(api_key);
        }

        if let Some(host) = lookup("PINECONE_INDEX_HOST") {
            self.host = normalize_host(&host);
        }

        if let Some(raw) = lookup("PINECONE_POOL_THREADS") {
            self.pool_threads = raw.trim().parse().map_err(|_| {
                PineconeError::Config(format!("PINECONE_POOL_THREADS is not a number: {}", raw))
            })?;
        }

        if let Some(raw) = lookup("PINECONE_TIMEOUT_SECS") {
            let secs = raw.trim().parse().map_err(|_| {
                PineconeError::Config(format!("PINECONE_TIMEOUT_SECS is not a number: {}", raw))
            })?;
            self.timeout_secs = Some(secs);
        }

        if let Some(level) = lookup("RUST_LOG") {
            self.log_level = Some(level);
        }

        if lookup("NO_COLOR").is_some() {
            self.no_color = true;
        }

        Ok(self)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over the environment and the
    /// config file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        api_key: Option<String>,
        pool_threads: Option<usize>,
        timeout_secs: Option<u64>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(host) = host {
            self.host = normalize_host(&host);
        }

        if let Some(api_key) = api_key {
            self.api_key = Some(api_key);
        }

        if let Some(pool_threads) = pool_threads {
            self.pool_threads = pool_threads;
        }

        if let Some(timeout_secs) = timeout_secs {
            self.timeout_secs = Some(timeout_secs);
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Per-request timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Validate that the configuration can back a network client.
    pub fn validate(&self) -> PineconeResult<()> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => {}
            _ => {
                return Err(PineconeError::Config(
                    "You haven't specified an API key. Set the PINECONE_API_KEY environment variable or pass --api-key.".to_string(),
                ))
            }
        }

        if self.host.is_empty() {
            return Err(PineconeError::Config(
                "No index host configured. Set PINECONE_INDEX_HOST or pass --host.".to_string(),
            ));
        }

        if self.pool_threads == 0 {
            return Err(PineconeError::Config(
                "pool_threads must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.api_key.is_none());
        assert!(config.host.is_empty());
        assert!(config.pool_threads >= 5);
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_normalize_host() {
        assert_eq!(normalize_host("idx.svc.pinecone.io"), "https://idx.svc.pinecone.io");
        assert_eq!(normalize_host("http://localhost:5080"), "http://localhost:5080");
        assert_eq!(normalize_host("https://idx.io"), "https://idx.io");
        assert_eq!(normalize_host(""), "");
    }

    #[test]
    fn test_env_overrides() {
        let config = ClientConfig::default()
            .apply_env(env_of(&[
                ("PINECONE_API_KEY", "secret"),
                ("PINECONE_INDEX_HOST", "idx.svc.pinecone.io"),
                ("PINECONE_POOL_THREADS", "8"),
                ("PINECONE_TIMEOUT_SECS", "30"),
                ("NO_COLOR", "1"),
            ]))
            .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.host, "https://idx.svc.pinecone.io");
        assert_eq!(config.pool_threads, 8);
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert!(config.no_color);
    }

    #[test]
    fn test_env_rejects_non_numeric_pool_threads() {
        let result = ClientConfig::default().apply_env(env_of(&[("PINECONE_POOL_THREADS", "many")]));
        assert!(matches!(result, Err(PineconeError::Config(_))));
    }

    #[test]
    fn test_merge_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "client:\n  apiKey: from-file\n  host: idx.example.io\n  poolThreads: 4\n  timeoutSecs: 12\nlogging:\n  level: debug\n  color: false"
        )
        .unwrap();

        let config = ClientConfig::default().merge_yaml(file.path()).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("from-file"));
        assert_eq!(config.host, "https://idx.example.io");
        assert_eq!(config.pool_threads, 4);
        assert_eq!(config.timeout_secs, Some(12));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert!(config.no_color);
    }

    #[test]
    fn test_env_beats_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "client:\n  apiKey: from-file").unwrap();

        let config = ClientConfig::default()
            .merge_yaml(file.path())
            .unwrap()
            .apply_env(env_of(&[("PINECONE_API_KEY", "from-env")]))
            .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_missing_config_file() {
        let result = ClientConfig::load_from(Some(PathBuf::from("/nonexistent/pinecone.yaml")));
        assert!(matches!(result, Err(PineconeError::Config(_))));
    }

    #[test]
    fn test_with_overrides() {
        let config = ClientConfig::default().with_overrides(
            Some("localhost:5080".to_string()),
            Some("key".to_string()),
            Some(3),
            None,
            None,
            true,
            false,
        );

        assert_eq!(config.host, "https://localhost:5080");
        assert_eq!(config.api_key.as_deref(), Some("key"));
        assert_eq!(config.pool_threads, 3);
        assert!(config.verbose);
        assert_eq!(config.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_validate() {
        let mut config = ClientConfig::default();
        assert!(config.validate().is_err());

        config.api_key = Some("key".to_string());
        assert!(config.validate().is_err());

        config.host = normalize_host("idx.io");
        assert!(config.validate().is_ok());

        config.pool_threads = 0;
        assert!(config.validate().is_err());
    }
}
