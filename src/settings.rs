use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShopError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_dataset_path")]
    pub dataset_path: String,
    /// K for every top-K view.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,
}

fn default_dataset_path() -> String {
    "shopping_trends.csv".to_string()
}

fn default_top_n() -> usize {
    10
}

fn default_histogram_bins() -> usize {
    15
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            top_n: default_top_n(),
            histogram_bins: default_histogram_bins(),
        }
    }
}

impl Settings {
    /// Both counts must be at least 1 or every top-N and histogram view is empty.
    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(ShopError::Settings("top_n must be at least 1".into()));
        }
        if self.histogram_bins == 0 {
            return Err(ShopError::Settings("histogram_bins must be at least 1".into()));
        }
        Ok(())
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("shoptrends")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

/// Missing or unreadable files fall back to defaults.
pub fn load_settings_from(path: &Path) -> Settings {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("ignoring unreadable settings at {}: {e}", path.display());
            Settings::default()
        }),
        Err(_) => Settings::default(),
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(settings, &settings_path())
}

pub fn save_settings_to(settings: &Settings, path: &Path) -> Result<()> {
    settings.validate()?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| ShopError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

/// Expand a leading `~` so paths typed at the prompt or saved in settings work.
pub fn shellexpand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest.trim_start_matches('/'));
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            dataset_path: "/tmp/trends.csv".to_string(),
            top_n: 5,
            histogram_bins: 20,
        };
        save_settings_to(&settings, &path).unwrap();
        let loaded = load_settings_from(&path);
        assert_eq!(loaded.dataset_path, "/tmp/trends.csv");
        assert_eq!(loaded.top_n, 5);
        assert_eq!(loaded.histogram_bins, 20);
    }

    #[test]
    fn test_load_returns_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let s = load_settings_from(&dir.path().join("missing.json"));
        assert_eq!(s.top_n, 10);
        assert_eq!(s.histogram_bins, 15);
        assert_eq!(s.dataset_path, "shopping_trends.csv");
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"dataset_path": "/data/x.csv"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.dataset_path, "/data/x.csv");
        assert_eq!(s.top_n, 10);
    }

    #[test]
    fn test_save_rejects_zero_top_n() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings { top_n: 0, ..Settings::default() };
        let err = save_settings_to(&settings, &dir.path().join("s.json")).unwrap_err();
        assert!(err.to_string().contains("top_n"), "got: {err}");
    }

    #[test]
    fn test_validate_rejects_zero_bins_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"histogram_bins": 0}"#).unwrap();
        let err = load_settings_from(&path).validate().unwrap_err();
        assert!(err.to_string().contains("histogram_bins"), "got: {err}");
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_shellexpand_plain_path() {
        assert_eq!(shellexpand_path("data/x.csv"), PathBuf::from("data/x.csv"));
    }
}
