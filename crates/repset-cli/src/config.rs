//! Settings and data locations.
//!
//! Settings live in the platform config folder, data in the platform data
//! folder:
//! - macOS: ~/Library/Application Support/app.repset.repset/
//! - Windows: %APPDATA%/repset/repset/
//! - Linux: ~/.config/repset/ and ~/.local/share/repset/

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;

use repset_model::SessionSettings;

const APP_QUALIFIER: &str = "app";
const APP_ORG: &str = "repset";
const APP_NAME: &str = "repset";
const CONFIG_FILENAME: &str = "settings.toml";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
}

/// Default settings file path, if the platform has a config folder.
pub fn settings_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Data directory: `explicit` when given, else the platform data folder.
pub fn data_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| anyhow!("could not determine a data directory; pass --store <DIR>"))
}

/// Load settings from `explicit` or the default path.
///
/// Falls back to defaults when the file is missing or cannot be parsed.
pub fn load_settings(explicit: Option<&Path>) -> SessionSettings {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match settings_path() {
            Some(path) => path,
            None => {
                tracing::warn!("could not determine settings path, using defaults");
                return SessionSettings::default();
            }
        },
    };
    read_settings(&path)
}

fn read_settings(path: &Path) -> SessionSettings {
    match fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                tracing::info!(path = %path.display(), "loaded settings");
                settings
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "invalid settings file, using defaults");
                SessionSettings::default()
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            SessionSettings::default()
        }
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "could not read settings, using defaults");
            SessionSettings::default()
        }
    }
}

/// Write settings as TOML, creating the parent directory.
pub fn save_settings(settings: &SessionSettings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config directory {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(settings).context("serialize settings")?;
    fs::write(path, content).with_context(|| format!("write {}", path.display()))?;
    tracing::info!(path = %path.display(), "saved settings");
    Ok(())
}
