// src/config.rs
//! Configuration: built-in defaults, then an optional TOML file, then environment overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use crate::app_log;

pub const DEFAULT_CONFIG_FILE: &str = "wuzzuf-pulse.toml";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigManager {
    pub environment: String,
    pub collector: CollectorConfig,
    pub storage: StorageConfig,
    pub dashboard: DashboardConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    pub base_url: String,
    pub search_terms: Vec<String>,
    pub pages_per_term: u32,
    pub timeout_seconds: u64,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub user_agent: String,
    pub markup: MarkupConfig,
}

/// CSS selectors for the result page. They track the site's generated class names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    pub card: String,
    pub heading: String,
    pub company: String,
    pub location: String,
    pub details: String,
    pub job_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub raw_file: String,
    pub clean_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub cache_ttl_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json_file: Option<PathBuf>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://wuzzuf.net/search/jobs/".to_string(),
            search_terms: vec!["Data Analyst".to_string(), "Machine Learning".to_string()],
            pages_per_term: 5,
            timeout_seconds: 10,
            min_delay_ms: 1000,
            max_delay_ms: 3000,
            user_agent: BROWSER_USER_AGENT.to_string(),
            markup: MarkupConfig::default(),
        }
    }
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            card: "div.css-ghe2tq".to_string(),
            heading: "h2".to_string(),
            company: "a.css-ipsyv7".to_string(),
            location: "span.css-16x61xq".to_string(),
            details: "div.css-1rhj4yg".to_string(),
            job_type: "div.css-5jhz9n".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            raw_file: "wuzzuf_jobs_raw.csv".to_string(),
            clean_file: "wuzzuf_jobs_clean.csv".to_string(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            cache_ttl_seconds: 3600,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_file: None,
        }
    }
}

impl ConfigManager {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, `wuzzuf-pulse.toml` in the
    /// working directory is read if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load_from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        if config.environment.is_empty() {
            config.environment = "local".to_string();
        }
        Ok(config)
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        app_log!(info, "Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply `PULSE_*` overrides through the given lookup.
    fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(env) = lookup("PULSE_ENVIRONMENT") {
            self.environment = env;
        }
        if let Some(dir) = lookup("PULSE_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(pages) = lookup("PULSE_PAGES") {
            self.collector.pages_per_term = pages
                .trim()
                .parse()
                .with_context(|| format!("PULSE_PAGES must be a number, got '{}'", pages))?;
        }
        if let Some(terms) = lookup("PULSE_SEARCH_TERMS") {
            self.collector.search_terms = terms
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect();
        }
        Ok(())
    }

    pub fn raw_path(&self) -> PathBuf {
        self.storage.data_dir.join(&self.storage.raw_file)
    }

    pub fn clean_path(&self) -> PathBuf {
        self.storage.data_dir.join(&self.storage.clean_file)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.dashboard.cache_ttl_seconds)
    }
}

impl CollectorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ConfigManager::default();
        assert_eq!(config.collector.pages_per_term, 5);
        assert_eq!(
            config.collector.search_terms,
            vec!["Data Analyst", "Machine Learning"]
        );
        assert_eq!(config.raw_path(), PathBuf::from("data/wuzzuf_jobs_raw.csv"));
        assert_eq!(config.clean_path(), PathBuf::from("data/wuzzuf_jobs_clean.csv"));
        assert_eq!(config.cache_ttl(), Duration::from_secs(3600));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ConfigManager = toml::from_str(
            r#"
            [collector]
            pages_per_term = 2

            [collector.markup]
            card = "div.job-card"

            [storage]
            data_dir = "/tmp/pulse"
            "#,
        )
        .unwrap();

        assert_eq!(config.collector.pages_per_term, 2);
        assert_eq!(config.collector.timeout_seconds, 10);
        assert_eq!(config.collector.markup.card, "div.job-card");
        assert_eq!(config.collector.markup.heading, "h2");
        assert_eq!(config.raw_path(), PathBuf::from("/tmp/pulse/wuzzuf_jobs_raw.csv"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("PULSE_DATA_DIR", "/srv/pulse"),
            ("PULSE_PAGES", "3"),
            ("PULSE_SEARCH_TERMS", "Rust, , Data Engineer"),
        ]
        .into_iter()
        .collect();

        let mut config = ConfigManager::default();
        config
            .apply_env_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.storage.data_dir, PathBuf::from("/srv/pulse"));
        assert_eq!(config.collector.pages_per_term, 3);
        assert_eq!(config.collector.search_terms, vec!["Rust", "Data Engineer"]);
    }

    #[test]
    fn test_invalid_pages_override_is_an_error() {
        let mut config = ConfigManager::default();
        let result = config.apply_env_overrides(|key| {
            (key == "PULSE_PAGES").then(|| "many".to_string())
        });
        assert!(result.is_err());
    }
}
