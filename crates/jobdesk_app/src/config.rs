use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use jobdesk_client::{ClientSettings, DEFAULT_BASE_URL};
use jobdesk_core::{
    SearchFilters, DEFAULT_KEYWORDS, DEFAULT_LOCATIONS, DEFAULT_MIN_SCORE, DEFAULT_POLL_INTERVAL,
    DEFAULT_ROLES,
};
use jobdesk_logging::{desk_debug, desk_info};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILENAME: &str = "jobdesk.ron";
pub const API_ENV_VAR: &str = "JOBDESK_API";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterDefaults {
    pub roles: String,
    pub locations: String,
    pub keywords: String,
    pub min_score: u8,
}

impl Default for FilterDefaults {
    fn default() -> Self {
        Self {
            roles: DEFAULT_ROLES.to_string(),
            locations: DEFAULT_LOCATIONS.to_string(),
            keywords: DEFAULT_KEYWORDS.to_string(),
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

/// Contents of `jobdesk.ron`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub poll_interval_ms: u64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: Option<u64>,
    pub filters: FilterDefaults,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            connect_timeout_secs: 10,
            request_timeout_secs: None,
            filters: FilterDefaults::default(),
        }
    }
}

impl AppConfig {
    /// Loads `explicit` if given, otherwise `./jobdesk.ron` when present.
    ///
    /// A missing default file yields the defaults; a missing explicit file is
    /// an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(CONFIG_FILENAME), false),
        };

        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound && !required => {
                desk_debug!("No config at {:?}; using defaults", path);
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        let config = Self::parse(&path, &content)?;
        desk_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::NotPositive {
                field: "poll_interval_ms",
            });
        }
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::NotPositive {
                field: "connect_timeout_secs",
            });
        }
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::NotPositive {
                field: "request_timeout_secs",
            });
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn search_filters(&self) -> SearchFilters {
        let mut filters = SearchFilters::default().with_min_score(self.filters.min_score);
        filters.roles_text = self.filters.roles.clone();
        filters.locations_text = self.filters.locations.clone();
        filters.keywords_text = self.filters.keywords.clone();
        filters
    }

    pub fn client_settings(&self, base_url: String) -> ClientSettings {
        ClientSettings {
            base_url,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// CLI flag, then environment, then config file. Blank values are skipped.
pub fn resolve_base_url(cli: Option<&str>, env: Option<&str>, config: &AppConfig) -> String {
    [cli, env]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| config.api_base_url.clone())
}
