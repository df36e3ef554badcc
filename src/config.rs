//! Settings parser for `config.toml` in the dashboard's config directory

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::model::ViewSelector;

const CONFIG_FILENAME: &str = "config.toml";
const APP_DIR: &str = "healthai";
const CONFIG_DIR_ENV: &str = "HEALTHAI_CONFIG_DIR";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// View key shown at startup. Unknown keys open the overview.
    pub start_view: String,
    pub window: WindowSettings,
    pub appearance: AppearanceSettings,
    pub data: DataSettings,
    pub inference: InferenceSettings,
    pub patients: PatientSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppearanceSettings {
    pub dark_theme: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Relative paths resolve against the config directory.
    pub patients_file: PathBuf,
    pub session_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InferenceSettings {
    pub simulated_delay_ms: u64,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PatientSettings {
    /// Rows in the overview's recent patients list.
    pub recent_count: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            start_view: ViewSelector::Overview.key().to_string(),
            window: WindowSettings::default(),
            appearance: AppearanceSettings::default(),
            data: DataSettings::default(),
            inference: InferenceSettings::default(),
            patients: PatientSettings::default(),
        }
    }
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

impl Default for AppearanceSettings {
    fn default() -> Self {
        Self { dark_theme: true }
    }
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            patients_file: PathBuf::from("patients.json"),
            session_file: PathBuf::from("session.json"),
        }
    }
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            simulated_delay_ms: 2000,
            timeout_secs: 30,
        }
    }
}

impl Default for PatientSettings {
    fn default() -> Self {
        Self { recent_count: 5 }
    }
}

impl Settings {
    pub fn start_view(&self) -> ViewSelector {
        ViewSelector::from_key(&self.start_view)
    }

    pub fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.inference.simulated_delay_ms)
    }

    pub fn inference_timeout(&self) -> Duration {
        Duration::from_secs(self.inference.timeout_secs.max(1))
    }

    /// Makes relative data paths absolute against `config_dir`.
    pub fn resolve_paths(mut self, config_dir: &Path) -> Self {
        if self.data.patients_file.is_relative() {
            self.data.patients_file = config_dir.join(&self.data.patients_file);
        }
        if self.data.session_file.is_relative() {
            self.data.session_file = config_dir.join(&self.data.session_file);
        }
        self
    }
}

/// `$HEALTHAI_CONFIG_DIR`, else `<platform config dir>/healthai`, else `.`
pub fn config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Loads settings from `config_dir/config.toml`, falling back to defaults.
pub fn load_settings(config_dir: &Path) -> Settings {
    let config_path = config_dir.join(CONFIG_FILENAME);

    let settings = if !config_path.exists() {
        log::debug!("No config file at {:?}, using defaults", config_path);
        Settings::default()
    } else {
        match std::fs::read_to_string(&config_path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => {
                    log::debug!("Loaded settings from {:?}", config_path);
                    settings
                }
                Err(e) => {
                    log::warn!("Failed to parse {:?}: {}", config_path, e);
                    Settings::default()
                }
            },
            Err(e) => {
                log::warn!("Failed to read {:?}: {}", config_path, e);
                Settings::default()
            }
        }
    };

    settings.resolve_paths(config_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_settings_defaults() {
        let temp = tempdir().unwrap();
        let settings = load_settings(temp.path());

        assert_eq!(settings.start_view(), ViewSelector::Overview);
        assert!(settings.appearance.dark_theme);
        assert_eq!(settings.simulated_delay(), Duration::from_secs(2));
        assert_eq!(settings.inference_timeout(), Duration::from_secs(30));
        assert_eq!(settings.patients.recent_count, 5);
        assert_eq!(
            settings.data.patients_file,
            temp.path().join("patients.json")
        );
    }

    #[test]
    fn test_load_settings_custom() {
        let temp = tempdir().unwrap();
        let config = r#"
start_view = "covid"

[window]
width = 600.0

[inference]
simulated_delay_ms = 10
timeout_secs = 5

[data]
patients_file = "/srv/patients.json"
"#;
        std::fs::write(temp.path().join("config.toml"), config).unwrap();

        let settings = load_settings(temp.path());

        assert_eq!(settings.start_view(), ViewSelector::Covid);
        assert_eq!(settings.window.width, 600.0);
        assert_eq!(settings.window.height, 800.0);
        assert_eq!(settings.simulated_delay(), Duration::from_millis(10));
        assert_eq!(settings.inference_timeout(), Duration::from_secs(5));
        assert_eq!(
            settings.data.patients_file,
            PathBuf::from("/srv/patients.json")
        );
        assert_eq!(
            settings.data.session_file,
            temp.path().join("session.json")
        );
    }

    #[test]
    fn test_load_settings_invalid_toml() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("config.toml"), "start_view = [").unwrap();

        let settings = load_settings(temp.path());
        assert_eq!(settings.start_view, "overview");
    }

    #[test]
    fn test_misspelled_start_view_opens_overview() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("config.toml"), "start_view = \"pneumona\"").unwrap();

        let settings = load_settings(temp.path());
        assert_eq!(settings.start_view(), ViewSelector::Overview);
    }

    #[test]
    fn test_zero_timeout_is_clamped() {
        let mut settings = Settings::default();
        settings.inference.timeout_secs = 0;
        assert_eq!(settings.inference_timeout(), Duration::from_secs(1));
    }
}
