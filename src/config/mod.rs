//! Configuration management module.
//!
//! This module handles loading and saving the configuration of the list
//! host: where the portal API lives, the endpoint paths of each list and the
//! tunables of the list views.

mod error;

pub use error::ConfigError;

use crate::error::AppError;
use log::LevelFilter;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

const FILE_NAME: &str = "config.yml";
const DEFAULT_DIRECTORY_PATH: &str = ".config/portal-listings";

/// Oversees management of configuration file.
///
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub base_url: String,
    pub announcements_path: String,
    pub downloadables_path: String,
    pub search_debounce_ms: u64,
    pub fetch_timeout_ms: u64,
    pub excerpt_word_limit: usize,
    pub log_level: String,
    pub(crate) file_path: Option<PathBuf>,
}

/// Define specification for configuration file.
///
#[derive(Serialize, Deserialize)]
struct FileSpec {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_announcements_path")]
    pub announcements_path: String,
    #[serde(default = "default_downloadables_path")]
    pub downloadables_path: String,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
    #[serde(default = "default_excerpt_word_limit")]
    pub excerpt_word_limit: usize,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_announcements_path() -> String {
    "/api/announcements".to_string()
}

fn default_downloadables_path() -> String {
    "/api/downloadables".to_string()
}

fn default_search_debounce_ms() -> u64 {
    300
}

fn default_fetch_timeout_ms() -> u64 {
    10_000
}

fn default_excerpt_word_limit() -> usize {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl Config {
    /// Return a new instance holding the defaults.
    ///
    pub fn new() -> Config {
        Config {
            base_url: default_base_url(),
            announcements_path: default_announcements_path(),
            downloadables_path: default_downloadables_path(),
            search_debounce_ms: default_search_debounce_ms(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            excerpt_word_limit: default_excerpt_word_limit(),
            log_level: default_log_level(),
            file_path: None,
        }
    }

    /// Try to load an existing configuration from the disk using the custom
    /// directory if provided. A missing file leaves the defaults in place;
    /// the directory is created so a later save succeeds.
    ///
    pub fn load(&mut self, custom_path: Option<&str>) -> Result<(), AppError> {
        // Use default path unless custom path provided
        let dir_path = match custom_path {
            Some(path) => Path::new(&path).to_path_buf(),
            None => Config::default_path()?,
        };

        if !dir_path.exists() {
            fs::create_dir_all(&dir_path).map_err(|e| ConfigError::CreateDirectoryFailed {
                path: dir_path.clone(),
                source: e,
            })?;
        }

        let file_path = dir_path.join(Path::new(FILE_NAME));
        if file_path.exists() {
            let contents = fs::read_to_string(&file_path).map_err(|e| ConfigError::LoadFailed {
                path: file_path.clone(),
                message: format!("IO error: {}", e),
            })?;
            let data: FileSpec = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::DeserializationFailed(e.to_string()))?;
            self.base_url = data.base_url;
            self.announcements_path = data.announcements_path;
            self.downloadables_path = data.downloadables_path;
            self.search_debounce_ms = data.search_debounce_ms;
            self.fetch_timeout_ms = data.fetch_timeout_ms;
            self.excerpt_word_limit = data.excerpt_word_limit;
            self.log_level = data.log_level;
        }
        self.file_path = Some(file_path);
        Ok(())
    }

    /// Serialize the configuration and write it to the disk, creating the
    /// directory if needed.
    ///
    pub fn save(&self) -> Result<(), AppError> {
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;
        let data = FileSpec {
            base_url: self.base_url.clone(),
            announcements_path: self.announcements_path.clone(),
            downloadables_path: self.downloadables_path.clone(),
            search_debounce_ms: self.search_debounce_ms,
            fetch_timeout_ms: self.fetch_timeout_ms,
            excerpt_word_limit: self.excerpt_word_limit,
            log_level: self.log_level.clone(),
        };
        let content = serde_yaml::to_string(&data)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        if let Some(parent) = file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::CreateDirectoryFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let mut file = fs::File::create(file_path).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        write!(file, "{}", content).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        file.flush().map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        Ok(())
    }

    /// Path of the configuration file once loaded.
    ///
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Parsed API base URL.
    ///
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidUrl {
            url: self.base_url.clone(),
            message: e.to_string(),
        })
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Level filter named by `log_level`, `info` when unreadable.
    ///
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    /// Returns the path buffer for the default path to the configuration file
    /// or an error if the home directory could not be found.
    ///
    fn default_path() -> Result<PathBuf, AppError> {
        match dirs::home_dir() {
            Some(home) => {
                let home_path = Path::new(&home);
                let default_config_path = Path::new(DEFAULT_DIRECTORY_PATH);
                Ok(home_path.join(default_config_path))
            }
            None => Err(ConfigError::HomeDirectoryNotFound.into()),
        }
    }
}
