//! ReelGrab configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use reelgrab_trigger::{StatusMessages, TriggerLabels};

use crate::error::CoreError;
use crate::Result;

pub const ENV_ENDPOINT: &str = "REELGRAB_ENDPOINT";
pub const ENV_DOWNLOAD_DIR: &str = "REELGRAB_DOWNLOAD_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the download backend
    pub endpoint_base: String,
    /// Path the request is POSTed to, joined onto `endpoint_base`
    pub endpoint_path: String,
    /// Directory saved files land in
    pub download_dir: PathBuf,
    /// Name given to every saved file
    pub file_name: String,
    /// Upper bound on request plus body read
    pub request_timeout_secs: u64,
    pub messages: StatusMessages,
    pub labels: TriggerLabels,
}

impl Config {
    pub fn new(download_dir: PathBuf) -> Self {
        Self {
            endpoint_base: "http://127.0.0.1:10000".to_string(),
            endpoint_path: "/download".to_string(),
            download_dir,
            file_name: "instagram_video.mp4".to_string(),
            request_timeout_secs: 300,
            messages: StatusMessages::default(),
            labels: TriggerLabels::default(),
        }
    }

    /// Read a JSON config file; missing fields take their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_json::from_str(&raw)?;
        tracing::debug!(path = %path.as_ref().display(), "Loaded config file");
        Ok(config)
    }

    /// Apply `REELGRAB_ENDPOINT` / `REELGRAB_DOWNLOAD_DIR` when set
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(endpoint) = std::env::var(ENV_ENDPOINT).ok().filter(|v| !v.trim().is_empty())
        {
            self.endpoint_base = endpoint;
        }
        if let Some(dir) = std::env::var_os(ENV_DOWNLOAD_DIR).filter(|v| !v.is_empty()) {
            self.download_dir = PathBuf::from(dir);
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.endpoint_path.trim().is_empty() {
            return Err(CoreError::Config("endpoint_path must not be empty".to_string()));
        }
        if self.file_name.trim().is_empty() {
            return Err(CoreError::Config("file_name must not be empty".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(CoreError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Platform download folder (xdg-user-dirs aware on Linux)
    pub fn default_download_dir() -> PathBuf {
        dirs::download_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
            .unwrap_or_else(|| PathBuf::from("Downloads"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::default_download_dir())
    }
}
