//! API credentials and the file that stores them.
//!
//! Credentials are read from `<config dir>/deepgram/deepgram.toml` and can be
//! overridden with the `DEEPGRAM_API_KEY` and `DEEPGRAM_API_URL` environment
//! variables.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use deepgram_logging::{LoggerHandle, get_logger};
use dirs::config_dir;
use serde::{Deserialize, Serialize};

use crate::APP_NAME;

/// Base URL of the hosted API.
pub const DEFAULT_API_URL: &str = "https://api.deepgram.com";

const API_KEY_ENV: &str = "DEEPGRAM_API_KEY";
const API_URL_ENV: &str = "DEEPGRAM_API_URL";

/// Credentials used to authenticate against the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Credentials {
    /// Deepgram API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// URL of an on-premise deployment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl Credentials {
    pub fn new(api_key: Option<String>, api_url: Option<String>) -> Self {
        Self { api_key, api_url }
    }

    /// Credentials for the hosted API with the given key.
    pub fn from_api_key(api_key: impl Into<String>) -> Self {
        Self::new(Some(api_key.into()), None)
    }

    /// Get the API key
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Get the API URL, falling back to the hosted endpoint.
    pub fn api_url(&self) -> &str {
        self.api_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_URL)
    }

    /// Overwrite fields with values found through `lookup`.
    ///
    /// Blank values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(key) = lookup(API_KEY_ENV) {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup(API_URL_ENV) {
            self.api_url = Some(url);
        }
    }
}

/// Manages loading and saving the credentials file.
pub struct CredentialsManager {
    path: PathBuf,
    logger: LoggerHandle,
}

impl CredentialsManager {
    /// Creates a manager for the default credentials file.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(Self::default_path()?))
    }

    /// Creates a manager for the credentials file inside `dir`.
    pub fn with_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self::with_path(dir.as_ref().join(format!("{}.toml", APP_NAME)))
    }

    fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            logger: get_logger("deepgram::credentials"),
        }
    }

    /// Returns the default path to the credentials file.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = config_dir().context("Failed to retrieve configuration directory")?;
        Ok(config_dir.join(APP_NAME).join(format!("{}.toml", APP_NAME)))
    }

    /// Loads credentials from the file, or defaults if it does not exist.
    pub fn load_file(&self) -> Result<Credentials> {
        if !self.path.exists() {
            self.logger.debug(format_args!("No credentials file at {:?}", self.path));
            return Ok(Credentials::default());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read credentials file at {:?}", self.path))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse credentials file at {:?}", self.path))
    }

    /// Loads credentials from the file, then applies environment overrides.
    pub fn load(&self) -> Result<Credentials> {
        let mut credentials = self.load_file()?;
        credentials.apply_overrides(|name| std::env::var(name).ok());

        if credentials.api_key().is_none() {
            self.logger.warn(format_args!(
                "Deepgram API key is not set. Requests will be rejected without it. \
                 Set {} or add api_key to {:?}.",
                API_KEY_ENV, self.path
            ));
        }

        Ok(credentials)
    }

    /// Saves credentials to the file, creating parent directories.
    pub fn save(&self, credentials: &Credentials) -> Result<()> {
        let dir = self
            .path
            .parent()
            .with_context(|| format!("Failed to get parent directory of {:?}", self.path))?;

        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config directory at {:?}", dir))?;

        let serialized =
            toml::to_string_pretty(credentials).context("Failed to serialize credentials")?;

        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write credentials file at {:?}", self.path))?;

        Ok(())
    }

    /// Returns the path to the credentials file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
