use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "starpad";
const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No configuration directory available on this platform")]
    NoConfigDir,

    #[error("Failed to read settings file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write settings file {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Settings of the handheld shell, read from `settings.toml`
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ShellSettings {
    /// Delay between repaints
    pub frame_interval_ms: u64,
    pub joystick_deadzone: f32,
    pub fullscreen: bool,
    /// Switches logging from INFO to DEBUG
    pub verbose: bool,
    pub font_size: f32,
    /// Where documents are saved; falls back to the platform data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents_dir: Option<PathBuf>,
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16,
            joystick_deadzone: 0.05,
            fullscreen: false,
            verbose: false,
            font_size: 18.0,
            documents_dir: None,
        }
    }
}

/// Where loaded settings came from, reported once logging is up
#[derive(Clone, Debug, PartialEq)]
pub enum SettingsOrigin {
    File(PathBuf),
    /// The file was missing and has been written with defaults
    Defaults(PathBuf),
}

impl fmt::Display for SettingsOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsOrigin::File(path) => write!(f, "Loaded settings from {}", path.display()),
            SettingsOrigin::Defaults(path) => write!(
                f,
                "Settings file {} did not exist, wrote defaults",
                path.display()
            ),
        }
    }
}

impl ShellSettings {
    /// Loads `<config dir>/starpad/settings.toml`, writing defaults when it is missing
    pub fn load() -> Result<(Self, SettingsOrigin), ConfigError> {
        let mut path = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        path.push(APP_DIR);
        path.push(SETTINGS_FILE);
        Self::load_from(&path)
    }

    /// Runs before the subscriber is installed; callers log the returned origin.
    pub fn load_from(path: &Path) -> Result<(Self, SettingsOrigin), ConfigError> {
        if !path.exists() {
            let settings = Self::default();
            settings.save_to(path)?;
            return Ok((settings, SettingsOrigin::Defaults(path.to_path_buf())));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Ok((settings, SettingsOrigin::File(path.to_path_buf())))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn documents_dir(&self) -> PathBuf {
        self.documents_dir.clone().unwrap_or_else(|| {
            let mut base = dirs::data_dir()
                .or_else(dirs::home_dir)
                .unwrap_or_else(|| PathBuf::from("."));
            base.push(APP_DIR);
            base.push("documents");
            base
        })
    }
}
