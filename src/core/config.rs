/*
 * Manages the persisted settings of the command-line front-end: the output
 * separator for multi-select results, the default log level, and optional
 * overrides for the helper programs (`zenity`, `osascript`).
 *
 * It uses a trait-based approach (`ConfigManagerOperations`) so tests can
 * substitute a manager rooted in a temporary directory. The concrete
 * `CoreConfigManager` stores `settings.json` in the directory returned by
 * `path_utils::get_base_app_config_local_dir`. Library calls never read these
 * settings; each dialog call is configured only by its options.
 */
use crate::core::path_utils;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const SETTINGS_FILENAME: &str = "settings.json";

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    NoProjectDirectory,
    Json(serde_json::Error),
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Configuration I/O error: {e}"),
            ConfigError::NoProjectDirectory => {
                write!(f, "Could not determine directory for configuration")
            }
            ConfigError::Json(e) => write!(f, "Configuration file is not valid JSON: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub separator: String,
    pub log_level: String,
    pub zenity_program: Option<PathBuf>,
    pub osascript_program: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            separator: "|".to_string(),
            log_level: "warn".to_string(),
            zenity_program: None,
            osascript_program: None,
        }
    }
}

impl Settings {
    /// The helper program override that applies to the current platform.
    pub fn program_override(&self) -> Option<&Path> {
        if cfg!(target_os = "macos") {
            self.osascript_program.as_deref()
        } else {
            self.zenity_program.as_deref()
        }
    }
}

pub trait ConfigManagerOperations: Send + Sync {
    fn load_settings(&self, app_name: &str) -> Result<Settings>;
    fn save_settings(&self, app_name: &str, settings: &Settings) -> Result<()>;
}

pub struct CoreConfigManager {}

impl CoreConfigManager {
    pub fn new() -> Self {
        CoreConfigManager {}
    }
}

impl Default for CoreConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/*
 * Reads settings from `dir/settings.json`. A missing or blank file yields the
 * defaults; fields absent from the document take their default values.
 */
fn load_settings_from(dir: &Path) -> Result<Settings> {
    let file_path = dir.join(SETTINGS_FILENAME);
    if !file_path.exists() {
        log::debug!("CoreConfigManager: Settings file {file_path:?} does not exist.");
        return Ok(Settings::default());
    }
    let contents = fs::read_to_string(&file_path)?;
    if contents.trim().is_empty() {
        log::debug!("CoreConfigManager: Settings file {file_path:?} is empty.");
        return Ok(Settings::default());
    }
    let settings = serde_json::from_str(&contents)?;
    log::debug!("CoreConfigManager: Loaded settings from {file_path:?}: {settings:?}");
    Ok(settings)
}

fn save_settings_to(dir: &Path, settings: &Settings) -> Result<()> {
    let file_path = dir.join(SETTINGS_FILENAME);
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(&file_path, json)?;
    log::debug!("CoreConfigManager: Saved settings to {file_path:?}.");
    Ok(())
}

impl ConfigManagerOperations for CoreConfigManager {
    fn load_settings(&self, app_name: &str) -> Result<Settings> {
        log::trace!("CoreConfigManager: Loading settings for app '{app_name}'");
        let config_dir = path_utils::get_base_app_config_local_dir(app_name)
            .ok_or(ConfigError::NoProjectDirectory)?;
        load_settings_from(&config_dir)
    }

    fn save_settings(&self, app_name: &str, settings: &Settings) -> Result<()> {
        log::trace!("CoreConfigManager: Saving settings for app '{app_name}'");
        let config_dir = path_utils::get_base_app_config_local_dir(app_name)
            .ok_or(ConfigError::NoProjectDirectory)?;
        save_settings_to(&config_dir, settings)
    }
}
