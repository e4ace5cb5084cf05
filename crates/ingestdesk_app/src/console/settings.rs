use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use ingestdesk_engine::{BackendSettings, DEFAULT_BACKEND_URL};
use ingestdesk_logging::desk_info;
use log::LevelFilter;
use serde::{Deserialize, Serialize};

pub const SETTINGS_FILENAME: &str = "ingestdesk.ron";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse settings from {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("failed to write settings to {path:?}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("settings file {0:?} already exists")]
    AlreadyExists(PathBuf),
    #[error("failed to serialize settings: {0}")]
    Serialize(String),
    #[error("unknown log level {0:?}")]
    LogLevel(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub backend_url: String,
    pub connect_timeout_secs: u64,
    /// Unset means requests may wait indefinitely.
    pub request_timeout_secs: Option<u64>,
    pub log_file: Option<PathBuf>,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: None,
            log_file: None,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn backend_settings(&self) -> BackendSettings {
        BackendSettings {
            base_url: self.backend_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn level_filter(&self) -> Result<LevelFilter, SettingsError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| SettingsError::LogLevel(self.log_level.clone()))
    }
}

/// Loads settings from `path`. A missing file yields defaults unless `required`.
pub(crate) fn load_settings(path: &Path, required: bool) -> Result<Settings, SettingsError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
            return Ok(Settings::default());
        }
        Err(source) => {
            return Err(SettingsError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let settings = ron::from_str(&content).map_err(|err| SettingsError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    desk_info!("Loaded settings from {:?}", path);
    Ok(settings)
}

pub(crate) fn save_settings(
    path: &Path,
    settings: &Settings,
    force: bool,
) -> Result<(), SettingsError> {
    if path.exists() && !force {
        return Err(SettingsError::AlreadyExists(path.to_path_buf()));
    }

    let pretty = ron::ser::PrettyConfig::new();
    let content = ron::ser::to_string_pretty(settings, pretty)
        .map_err(|err| SettingsError::Serialize(err.to_string()))?;
    fs::write(path, content).map_err(|source| SettingsError::Write {
        path: path.to_path_buf(),
        source,
    })
}
