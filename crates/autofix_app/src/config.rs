use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use autofix_engine::{BackendSettings, SyncSettings, POLL_INTERVAL};
use autofix_logging::{autofix_info, LogDestination};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::cli::WatchArgs;

pub const DEFAULT_CONFIG_FILE: &str = "./autofix.ron";

/// Driver settings as read from a RON file. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub auth_token: Option<String>,
    pub poll_interval_ms: u64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// `file`, `terminal` or `both`.
    pub log: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let backend = BackendSettings::default();
        Self {
            base_url: backend.base_url,
            auth_token: backend.auth_token,
            poll_interval_ms: POLL_INTERVAL.as_millis() as u64,
            connect_timeout_secs: backend.connect_timeout.as_secs(),
            request_timeout_secs: backend.request_timeout.as_secs(),
            log: "file".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Reads `path`, or [`DEFAULT_CONFIG_FILE`] when it exists, or falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = ron::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        autofix_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Command-line values win over the file.
    pub fn apply_overrides(&mut self, args: &WatchArgs) {
        if let Some(base_url) = &args.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(token) = &args.token {
            self.auth_token = Some(token.clone());
        }
        if let Some(ms) = args.poll_interval_ms {
            self.poll_interval_ms = ms;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            bail!("poll_interval_ms must be greater than zero");
        }
        if self.base_url.trim().is_empty() {
            bail!("base_url must not be empty");
        }
        self.log_destination()?;
        self.log_level()?;
        Ok(())
    }

    pub fn backend_settings(&self) -> BackendSettings {
        BackendSettings {
            base_url: self.base_url.clone(),
            auth_token: self.auth_token.clone().filter(|token| !token.is_empty()),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn sync_settings(&self) -> SyncSettings {
        SyncSettings {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }

    pub fn log_destination(&self) -> Result<LogDestination> {
        match LogDestination::from_name(&self.log) {
            Some(destination) => Ok(destination),
            None => bail!("unknown log destination {:?}", self.log),
        }
    }

    pub fn log_level(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| anyhow!("unknown log level {:?}", self.log_level))
    }
}
