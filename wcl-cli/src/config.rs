// ABOUTME: Configuration file loading, validation, and hierarchical merging for the wcl CLI
// ABOUTME: Supports TOML config files with XDG Base Directory specification compliance

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;
use wcl_sdk::constants::{auth, pagination, timeouts, urls};

use crate::constants::{config as files, output};

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// GraphQL endpoint
    #[serde(default)]
    pub endpoint: Option<String>,
    /// OAuth token endpoint
    #[serde(default)]
    pub token_url: Option<String>,
    /// Where the access token is cached between runs
    #[serde(default)]
    pub token_path: Option<PathBuf>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default, deserialize_with = "validate_positive")]
    pub timeout_secs: Option<u64>,
    #[serde(default, deserialize_with = "validate_positive")]
    pub max_pages: Option<u64>,
    /// Cache cacheable queries in memory for the life of the process
    #[serde(default)]
    pub cache: Option<bool>,
    /// Also keep cached bodies in this SQLite database across runs
    #[serde(default)]
    pub cache_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from standard XDG-compliant locations
    pub fn load() -> Result<Self> {
        let paths = Self::get_config_paths();
        Self::load_from_paths(&paths.iter().map(|p| p.as_str()).collect::<Vec<_>>())
    }

    /// Load configuration from specific file paths in order of precedence
    pub fn load_from_paths(paths: &[&str]) -> Result<Self> {
        let mut config = Config::default();

        for path in paths {
            if !Path::new(path).exists() {
                continue;
            }
            // Apply in order - later paths override earlier ones
            let file_config = Self::load_from_file(path)?;
            log::debug!("loaded config from {path}");
            config = config.merge(file_config);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a single file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content).with_context(|| {
            format!(
                "Failed to parse TOML config file: {}",
                path.as_ref().display()
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get standard config file paths in order of precedence (lowest first)
    pub fn get_config_paths() -> Vec<String> {
        let mut paths = Vec::new();

        // 1. User config directory fallback
        if let Some(home_dir) = dirs::home_dir() {
            let path = home_dir
                .join(".config")
                .join(files::APP_DIR)
                .join(files::USER_FILE);
            paths.push(path.to_string_lossy().to_string());
        }

        // 2. XDG config home
        if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME") {
            let path = PathBuf::from(config_home)
                .join(files::APP_DIR)
                .join(files::USER_FILE);
            paths.push(path.to_string_lossy().to_string());
        }

        // 3. Project-specific config (highest precedence)
        if let Ok(current_dir) = std::env::current_dir() {
            paths.push(
                current_dir
                    .join(files::PROJECT_FILE)
                    .to_string_lossy()
                    .to_string(),
            );
        }

        paths
    }

    /// Merge this config with another, giving precedence to the other config
    pub fn merge(self, other: Config) -> Config {
        Config {
            endpoint: other.endpoint.or(self.endpoint),
            token_url: other.token_url.or(self.token_url),
            token_path: other.token_path.or(self.token_path),
            output_dir: other.output_dir.or(self.output_dir),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            max_pages: other.max_pages.or(self.max_pages),
            cache: other.cache.or(self.cache),
            cache_path: other.cache_path.or(self.cache_path),
        }
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [("endpoint", &self.endpoint), ("token_url", &self.token_url)] {
            if let Some(value) = value {
                Url::parse(value).map_err(|e| anyhow!("Invalid {key} '{value}': {e}"))?;
            }
        }
        Ok(())
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(urls::WCL_API_CLIENT)
    }

    pub fn token_url(&self) -> &str {
        self.token_url.as_deref().unwrap_or(urls::WCL_OAUTH_TOKEN)
    }

    pub fn token_path(&self) -> PathBuf {
        self.token_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(auth::DEFAULT_TOKEN_PATH))
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(output::DEFAULT_OUTPUT_DIR))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(timeouts::HTTP_REQUEST_TIMEOUT)
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
            .and_then(|pages| usize::try_from(pages).ok())
            .unwrap_or(pagination::MAX_PAGES)
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache.unwrap_or(true)
    }

    /// Database for the persistent cache; `None` keeps the cache in memory only.
    pub fn cache_path(&self) -> Option<&Path> {
        self.cache_path.as_deref()
    }
}

// Custom deserializer rejecting zero for counts and durations
fn validate_positive<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = Option::<u64>::deserialize(deserializer)?;
    match value {
        Some(0) => Err(D::Error::custom("value must be greater than zero")),
        other => Ok(other),
    }
}
