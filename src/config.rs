//! Client configuration.
//!
//! Built once at startup from, in increasing priority:
//! - `config.toml` in the user config dir (`~/.config/ctxsync/` on Linux)
//!   or an explicit path
//! - `CTXSYNC_*` environment variables
//! - command-line flags, applied by the binary
//!
//! The resulting [`Config`] is passed down explicitly; nothing else reads the
//! environment.

use crate::error::CtxsyncError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_URL: &str = "CTXSYNC_API_URL";
pub const ENV_TOKEN: &str = "CTXSYNC_TOKEN";
pub const ENV_PROJECT: &str = "CTXSYNC_PROJECT";
pub const ENV_TIMEOUT: &str = "CTXSYNC_TIMEOUT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub token: Option<String>,
    pub project_id: Option<String>,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            project_id: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// `<config dir>/ctxsync/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ctxsync").join("config.toml"))
}

impl Config {
    /// Parses a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, CtxsyncError> {
        let content = std::fs::read_to_string(path).map_err(|e| CtxsyncError::io(path, e))?;
        toml::from_str(&content)
            .map_err(|e| CtxsyncError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Loads `explicit` (which must exist) or else the default location
    /// (which may be absent), then applies environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self, CtxsyncError> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.with_env(|key| std::env::var(key).ok())
    }

    /// Applies `CTXSYNC_*` overrides looked up through `lookup`.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, CtxsyncError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(token) = lookup(ENV_TOKEN) {
            self.token = Some(token);
        }
        if let Some(project) = lookup(ENV_PROJECT) {
            self.project_id = Some(project);
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT) {
            self.timeout_secs = timeout.trim().parse().map_err(|_| {
                CtxsyncError::Config(format!("{ENV_TIMEOUT} must be a number of seconds, got '{timeout}'"))
            })?;
        }
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Checks the fields an upload needs and returns the project id.
    pub fn validate_for_upload(&self) -> Result<&str, CtxsyncError> {
        let url = self.api_url.trim();
        if url.is_empty() {
            return Err(CtxsyncError::Config("api_url is not set".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CtxsyncError::Config(format!(
                "api_url must start with http:// or https://, got '{url}'"
            )));
        }
        if self.timeout_secs == 0 {
            return Err(CtxsyncError::Config("timeout_secs must be positive".into()));
        }
        match self.project_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(CtxsyncError::Config(format!(
                "no project id: pass --project or set {ENV_PROJECT}"
            ))),
        }
    }
}
