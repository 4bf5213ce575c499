use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::{CourseError, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8001";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CAROUSEL_INTERVAL_MS: u64 = 5000;
const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub carousel_interval_ms: u64,
    pub log_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            carousel_interval_ms: DEFAULT_CAROUSEL_INTERVAL_MS,
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

/// Values given on the command line; `None` leaves the file/default value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            CourseError::config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(api_url) = overrides.api_url {
            config.api_url = api_url;
        }
        if let Some(log_dir) = overrides.log_dir {
            config.log_dir = log_dir;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api_url)
            .map_err(|e| CourseError::config(format!("api_url '{}': {}", self.api_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CourseError::config(format!(
                "api_url must be http(s), got '{}'",
                url.scheme()
            )));
        }
        if self.carousel_interval_ms == 0 {
            return Err(CourseError::config("carousel_interval_ms must be positive"));
        }
        if self.request_timeout_secs == 0 {
            return Err(CourseError::config("request_timeout_secs must be positive"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn carousel_interval(&self) -> Duration {
        Duration::from_millis(self.carousel_interval_ms)
    }
}
