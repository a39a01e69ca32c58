//! Browser-persisted settings.

use serde::{Deserialize, Serialize};

/// Backend used when nothing is configured.
pub const DEFAULT_API_BASE: &str = match option_env!("SIGSCOPE_API_BASE") {
    Some(url) => url,
    None => "http://127.0.0.1:5000",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
}

impl LogLevel {
    pub fn to_level(self) -> log::Level {
        match self {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base: String,
    pub log_level: LogLevel,
    /// Run AirVIEW detection on upload.
    pub airview: bool,
    /// Ask the backend for capture statistics on upload.
    pub statistics: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            log_level: LogLevel::default(),
            airview: false,
            statistics: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppConfig {
    const LOCALSTORAGE_KEY: &'static str = "sigscope-config";

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Stored config, or defaults when absent or unreadable.
    pub fn load() -> Self {
        Self::load_from_local_storage().unwrap_or_default()
    }

    fn load_from_local_storage() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        match storage.get_item(Self::LOCALSTORAGE_KEY) {
            Ok(Some(json)) => match Self::from_json(&json) {
                Ok(config) => Some(config),
                Err(e) => {
                    log::warn!("Ignoring stored config: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                log::warn!("Failed to read from localStorage: {:?}", e);
                None
            }
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let storage = web_sys::window()
            .ok_or_else(|| ConfigError::Storage("No window object available".to_string()))?
            .local_storage()
            .map_err(|e| ConfigError::Storage(format!("localStorage access error: {:?}", e)))?
            .ok_or_else(|| ConfigError::Storage("localStorage not available".to_string()))?;
        storage
            .set_item(Self::LOCALSTORAGE_KEY, &self.to_json()?)
            .map_err(|e| ConfigError::Storage(format!("Failed to save to localStorage: {:?}", e)))?;
        log::debug!("Saved configuration to localStorage");
        Ok(())
    }

    pub fn upload_options(&self) -> sigscope_core::api::UploadOptions {
        sigscope_core::api::UploadOptions {
            airview: self.airview,
            statistics: self.statistics,
            ..Default::default()
        }
    }
}
