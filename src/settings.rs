//! User settings stored as settings.json in the app data directory

use crate::constants::{DEFAULT_CITY_NAME, DEFAULT_DISCOUNT_PERCENT, DEFAULT_SHIFT_PRICE};
use crate::fare::FarePolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window geometry
    pub window_x: Option<f32>,
    pub window_y: Option<f32>,
    pub window_w: Option<f32>,
    pub window_h: Option<f32>,

    // Tariff
    pub city_name: String,
    pub shift_price: i64,
    pub discount_percent: u8,

    // Site
    pub maintenance_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_x: None,
            window_y: None,
            window_w: None,
            window_h: None,
            city_name: DEFAULT_CITY_NAME.to_string(),
            shift_price: DEFAULT_SHIFT_PRICE,
            discount_percent: DEFAULT_DISCOUNT_PERCENT,
            maintenance_mode: false,
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("settings.json");
        match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Settings loaded");
                    settings
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) {
        let path = data_dir.join("settings.json");
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(error = %e, "Failed to save settings");
                } else {
                    debug!(path = %path.display(), "Settings saved");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize settings"),
        }
    }

    pub fn fare_policy(&self) -> FarePolicy {
        FarePolicy::new(self.discount_percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.shift_price, 350);
        assert_eq!(settings.fare_policy().discount_percent(), 30);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            window_w: Some(1200.0),
            city_name: "Nizhny".into(),
            shift_price: 400,
            discount_percent: 25,
            maintenance_mode: true,
            ..Settings::default()
        };
        settings.save(dir.path());
        assert_eq!(Settings::load(dir.path()), settings);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), r#"{"shift_price": 500}"#).unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings.shift_price, 500);
        assert_eq!(settings.discount_percent, 30);
        assert_eq!(settings.city_name, "Pavlovo");
    }

    #[test]
    fn garbage_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "not json").unwrap();
        assert_eq!(Settings::load(dir.path()), Settings::default());
    }
}
