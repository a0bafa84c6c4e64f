//! `hospnet` settings, stored as TOML.
//!
//! Looked up in `--config` when given, otherwise in the platform config
//! folder:
//! - Linux: ~/.config/hospnet/
//! - macOS: ~/Library/Application Support/br.hospnet.hospnet/
//! - Windows: %APPDATA%/hospnet/hospnet/config/

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use hospnet_flows::registration::VIACEP_URL;
use hospnet_persistence::AutoSaveConfig;
use hospnet_wizard::DEFAULT_SUBMIT_TIMEOUT;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const APP_QUALIFIER: &str = "br";
const APP_ORG: &str = "hospnet";
const APP_NAME: &str = "hospnet";
const CONFIG_FILENAME: &str = "settings.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid settings file {path}: {field} must be greater than zero")]
    NotPositive { path: PathBuf, field: &'static str },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub lookup: LookupSettings,
    pub autosave: AutoSaveConfig,
}

/// The hospital back end that receives registrations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub submit_timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            submit_timeout_secs: DEFAULT_SUBMIT_TIMEOUT.as_secs(),
        }
    }
}

impl ApiSettings {
    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.submit_timeout_secs)
    }
}

/// Postal-code lookup used for address autofill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            base_url: VIACEP_URL.to_string(),
            timeout_secs: 5,
        }
    }
}

impl LookupSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Settings {
    /// Load from `explicit` if given, otherwise from [`Settings::config_path`].
    ///
    /// An explicit file must exist and parse. The default file is optional,
    /// and a broken one falls back to defaults with a warning.
    pub fn load(explicit: Option<&Path>) -> Result<Self, SettingsError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        let Some(path) = Self::config_path() else {
            tracing::warn!("could not determine settings path, using defaults");
            return Ok(Self::default());
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        match Self::load_from(&path) {
            Ok(settings) => Ok(settings),
            Err(error) => {
                tracing::warn!(%error, "ignoring settings file");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.check_timeouts(path)?;
        tracing::info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    fn check_timeouts(&self, path: &Path) -> Result<(), SettingsError> {
        let zero = [
            ("api.submit_timeout_secs", self.api.submit_timeout_secs),
            ("lookup.timeout_secs", self.lookup.timeout_secs),
        ]
        .into_iter()
        .find(|(_, secs)| *secs == 0);
        match zero {
            Some((field, _)) => Err(SettingsError::NotPositive {
                path: path.to_path_buf(),
                field,
            }),
            None => Ok(()),
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
    }
}

/// Folder where wizard drafts are kept between runs.
pub fn default_draft_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("drafts"))
        .unwrap_or_else(|| PathBuf::from("drafts"))
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [api]
            base_url = "https://hospital.example/api"

            [autosave]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(settings.api.base_url, "https://hospital.example/api");
        assert_eq!(settings.api.submit_timeout(), DEFAULT_SUBMIT_TIMEOUT);
        assert_eq!(settings.lookup, LookupSettings::default());
        assert!(!settings.autosave.enabled);
        assert_eq!(settings.autosave.debounce_ms, AutoSaveConfig::default().debounce_ms);
    }

    #[test]
    fn round_trips_through_toml() {
        let settings = Settings::default();
        let text = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, SettingsError::Read { .. }));
    }

    #[test]
    fn malformed_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[api\nbase_url = 1").unwrap();
        let err = Settings::load(Some(&path)).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    fn zero_timeouts_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[api]\nsubmit_timeout_secs = 0\n").unwrap();
        let err = Settings::load(Some(&path)).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::NotPositive { field: "api.submit_timeout_secs", .. }
        ));

        std::fs::write(&path, "[lookup]\ntimeout_secs = 0\n").unwrap();
        let err = Settings::load(Some(&path)).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::NotPositive { field: "lookup.timeout_secs", .. }
        ));
    }
}
