use crate::filter::{DEFAULT_SEPARATOR, MatchMode};
use crate::splitter::RunOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse settings file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Failed to write settings file '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Values remembered between invocations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub last_input_path: Option<PathBuf>,
    pub last_filter: String,
    pub separator: char,
    pub last_match_all: bool,
    pub last_case_sensitive: bool,
    pub last_output_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            last_input_path: None,
            last_filter: String::new(),
            separator: DEFAULT_SEPARATOR,
            last_match_all: false,
            last_case_sensitive: true,
            last_output_path: None,
        }
    }
}

impl Settings {
    /// Options as they were at the end of the last run
    pub fn to_options(&self) -> RunOptions {
        RunOptions {
            input: self.last_input_path.clone(),
            filter_text: self.last_filter.clone(),
            separator: self.separator,
            mode: MatchMode::from_match_all(self.last_match_all),
            case_sensitive: self.last_case_sensitive,
            output_dir: self.last_output_path.clone(),
        }
    }

    /// Record the options of a run attempt
    pub fn remember(&mut self, options: &RunOptions) {
        self.last_input_path = options.input.clone();
        self.last_filter = options.filter_text.clone();
        self.separator = options.separator;
        self.last_match_all = options.mode.is_match_all();
        self.last_case_sensitive = options.case_sensitive;
        self.last_output_path = options.output_dir.clone();
    }
}

/// `<config dir>/log-splitter/settings.toml`, if the platform has a config dir
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("log-splitter").join("settings.toml"))
}

/// Load settings; a file that does not exist yet yields the defaults
pub fn load_settings(path: &Path) -> Result<Settings, SettingsError> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let path_display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path_display.clone(),
        source,
    })?;

    toml::from_str::<Settings>(&raw).map_err(|source| SettingsError::Parse {
        path: path_display,
        source,
    })
}

pub fn save_settings(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    let path_display = path.display().to_string();
    let body = toml::to_string_pretty(settings)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
            path: path_display.clone(),
            source,
        })?;
    }

    fs::write(path, body).map_err(|source| SettingsError::Write {
        path: path_display,
        source,
    })
}
