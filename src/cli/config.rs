//! Configuration file handling for the TravelBook CLI
//!
//! Manages loading and saving CLI configuration from ~/.travelbook/config.toml
//! and resolving the API location and credentials from multiple sources.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::api::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::errors::TravelBookError;
use crate::session::TokenStore;

/// Environment variable holding a bearer token
pub const TOKEN_ENV: &str = "TRAVELBOOK_TOKEN";

/// Environment variable holding the API base URL
pub const BASE_URL_ENV: &str = "TRAVELBOOK_API_URL";

/// CLI configuration stored in ~/.travelbook/config.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Bearer token of the signed-in account
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// API root, e.g. http://localhost:5000/api
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl CliConfig {
    /// Get the default configuration file path (~/.travelbook/config.toml)
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Unable to determine home directory")?;

        let mut path = PathBuf::from(home);
        path.push(".travelbook");
        path.push("config.toml");

        Ok(path)
    }

    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_path()?)
    }

    /// Load configuration from a specific path; a missing file is empty
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}

/// Token kept in the `token` key of a CLI config file. Saving and clearing
/// rewrite the file and leave the other keys alone.
#[derive(Debug, Clone)]
pub struct ConfigTokenStore {
    path: PathBuf,
}

impl ConfigTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by ~/.travelbook/config.toml
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(CliConfig::config_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn update(&self, token: Option<String>) -> Result<()> {
        let mut config = CliConfig::load_from_path(&self.path)?;
        config.token = token;
        config.save_to_path(&self.path)
    }
}

fn store_error(error: anyhow::Error) -> TravelBookError {
    TravelBookError::config_with_source("Token store unavailable", error.into())
}

impl TokenStore for ConfigTokenStore {
    fn load(&self) -> crate::errors::Result<Option<String>> {
        let config = CliConfig::load_from_path(&self.path).map_err(store_error)?;
        Ok(config.token.filter(|token| !token.is_empty()))
    }

    fn save(&self, token: &str) -> crate::errors::Result<()> {
        self.update(Some(token.to_string())).map_err(store_error)
    }

    fn clear(&self) -> crate::errors::Result<()> {
        self.update(None).map_err(store_error)
    }
}

/// Where the bearer token for this invocation came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    /// --token, --token-file or the environment; used for this run only
    Explicit(String),
    /// The config file, which login and logout also write to
    ConfigFile,
}

/// Resolve the authentication token from multiple sources
///
/// Checks sources in the following priority order:
/// 1. --token command line flag
/// 2. --token-file command line flag
/// 3. ~/.travelbook/config.toml
/// 4. TRAVELBOOK_TOKEN environment variable
///
/// With none of them set the config file is still the source, so a login
/// can store its token there.
pub fn resolve_token(
    token_flag: Option<String>,
    token_file_flag: Option<PathBuf>,
    config: &CliConfig,
) -> Result<TokenSource> {
    if let Some(token) = token_flag {
        debug!("Using token from --token flag");
        return Ok(TokenSource::Explicit(token));
    }

    if let Some(token_file) = token_file_flag {
        debug!("Reading token from file: {}", token_file.display());
        let token = std::fs::read_to_string(&token_file)
            .with_context(|| format!("Failed to read token file: {}", token_file.display()))?
            .trim()
            .to_string();

        if token.is_empty() {
            anyhow::bail!("Token file is empty: {}", token_file.display());
        }

        return Ok(TokenSource::Explicit(token));
    }

    if config.token.as_deref().is_some_and(|token| !token.is_empty()) {
        debug!("Using token from config file");
        return Ok(TokenSource::ConfigFile);
    }

    if let Ok(token) = std::env::var(TOKEN_ENV) {
        if !token.is_empty() {
            debug!("Using token from {} environment variable", TOKEN_ENV);
            return Ok(TokenSource::Explicit(token));
        }
    }

    Ok(TokenSource::ConfigFile)
}

/// Resolve the base URL from multiple sources
///
/// Checks sources in the following priority order:
/// 1. --base-url command line flag
/// 2. ~/.travelbook/config.toml
/// 3. TRAVELBOOK_API_URL environment variable
/// 4. Default: http://localhost:5000/api
pub fn resolve_base_url(base_url_flag: Option<String>, config: &CliConfig) -> String {
    if let Some(url) = base_url_flag {
        debug!("Using base URL from --base-url flag: {}", url);
        return url;
    }

    if let Some(url) = config.base_url.as_ref().filter(|url| !url.is_empty()) {
        debug!("Using base URL from config file: {}", url);
        return url.clone();
    }

    if let Ok(url) = std::env::var(BASE_URL_ENV) {
        if !url.is_empty() {
            debug!("Using base URL from {} environment variable: {}", BASE_URL_ENV, url);
            return url;
        }
    }

    debug!("Using default base URL: {}", DEFAULT_BASE_URL);
    DEFAULT_BASE_URL.to_string()
}

/// Resolve the timeout: --timeout flag, then config file, then 10 seconds
pub fn resolve_timeout(timeout_flag: Option<u64>, config: &CliConfig) -> u64 {
    if let Some(timeout) = timeout_flag {
        debug!("Using timeout from --timeout flag: {} seconds", timeout);
        return timeout;
    }

    if let Some(timeout) = config.timeout {
        debug!("Using timeout from config file: {} seconds", timeout);
        return timeout;
    }

    DEFAULT_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_serialization() {
        let config = CliConfig {
            token: Some("test_token".to_string()),
            base_url: Some("http://example.com/api".to_string()),
            timeout: Some(60),
        };

        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("token = \"test_token\""));
        assert!(toml_str.contains("base_url = \"http://example.com/api\""));
        assert!(toml_str.contains("timeout = 60"));
        assert_eq!(toml::to_string(&CliConfig::default()).unwrap(), "");
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let config = CliConfig {
            token: None,
            base_url: Some("http://example.com/api".to_string()),
            timeout: Some(5),
        };

        config.save_to_path(&config_path).unwrap();
        assert_eq!(CliConfig::load_from_path(&config_path).unwrap(), config);
    }

    #[test]
    fn test_config_load_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = CliConfig::load_from_path(&temp_dir.path().join("missing.toml")).unwrap();
        assert_eq!(loaded, CliConfig::default());
    }

    #[test]
    fn test_config_token_store_keeps_other_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        CliConfig { base_url: Some("http://api.test".into()), ..CliConfig::default() }
            .save_to_path(&path)
            .unwrap();

        let store = ConfigTokenStore::new(&path);
        assert_eq!(store.load().unwrap(), None);

        store.save("jwt-123").unwrap();
        assert_eq!(store.load().unwrap(), Some("jwt-123".to_string()));

        store.clear().unwrap();
        let config = CliConfig::load_from_path(&path).unwrap();
        assert_eq!(config.token, None);
        assert_eq!(config.base_url.as_deref(), Some("http://api.test"));
    }

    #[test]
    fn test_resolve_token_precedence() {
        let temp_dir = TempDir::new().unwrap();
        let token_file = temp_dir.path().join("token");
        std::fs::write(&token_file, "  from-file \n").unwrap();
        let config = CliConfig { token: Some("from-config".into()), ..CliConfig::default() };

        assert_eq!(
            resolve_token(Some("flag".into()), Some(token_file.clone()), &config).unwrap(),
            TokenSource::Explicit("flag".into())
        );
        assert_eq!(
            resolve_token(None, Some(token_file), &config).unwrap(),
            TokenSource::Explicit("from-file".into())
        );
        assert_eq!(resolve_token(None, None, &config).unwrap(), TokenSource::ConfigFile);
    }

    #[test]
    fn test_empty_token_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let token_file = temp_dir.path().join("token");
        std::fs::write(&token_file, "   ").unwrap();
        assert!(resolve_token(None, Some(token_file), &CliConfig::default()).is_err());
    }

    #[test]
    fn test_resolve_base_url_and_timeout() {
        let config = CliConfig {
            base_url: Some("http://config.test/api".into()),
            timeout: Some(42),
            ..CliConfig::default()
        };
        assert_eq!(resolve_base_url(Some("http://flag.test".into()), &config), "http://flag.test");
        assert_eq!(resolve_base_url(None, &config), "http://config.test/api");
        assert_eq!(resolve_timeout(Some(3), &config), 3);
        assert_eq!(resolve_timeout(None, &config), 42);
        assert_eq!(resolve_timeout(None, &CliConfig::default()), DEFAULT_TIMEOUT_SECS);
    }
}
