use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "reminder-calendar";
const DEFAULT_FILE: &str = "reminders.txt";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Colour overrides, applied on top of `preset`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ThemeSettings {
    pub preset: Option<String>,
    pub today_fg: Option<String>,
    pub today_bg: Option<String>,
    pub selected_fg: Option<String>,
    pub selected_bg: Option<String>,
    pub header_fg: Option<String>,
    pub dim_fg: Option<String>,
    pub border_fg: Option<String>,
    pub status_fg: Option<String>,
    pub status_bg: Option<String>,
    pub highlight_bg: Option<String>,
    pub high_fg: Option<String>,
    pub moderate_fg: Option<String>,
    pub low_fg: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub reminders_file: Option<PathBuf>,
    pub archive_file: Option<PathBuf>,
    pub archive_completed: bool,
    pub background_writes: bool,
    pub theme: ThemeSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reminders_file: None,
            archive_file: None,
            archive_completed: true,
            background_writes: true,
            theme: ThemeSettings::default(),
        }
    }
}

impl Settings {
    /// Reads the user config file, falling back to defaults when it is
    /// missing or broken.
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{e}; using defaults");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn reminders_path(&self) -> PathBuf {
        self.reminders_file.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join(APP_DIR).join(DEFAULT_FILE))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE))
        })
    }

    /// Where completed reminders go, or `None` when they are discarded.
    pub fn archive_path(&self) -> Option<PathBuf> {
        if !self.archive_completed {
            return None;
        }
        if let Some(path) = &self.archive_file {
            return Some(path.clone());
        }
        let reminders = self.reminders_path();
        let stem = reminders
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "reminders".to_string());
        Some(reminders.with_file_name(format!("{stem}.done.txt")))
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}
