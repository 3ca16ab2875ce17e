//! Persisted light/dark theme preference.
//!
//! The preference lives in a small JSON key-value file under the user data
//! dir (`preferences.json`), keyed by [`THEME_KEY`]. Only `"dark"` selects the
//! dark theme; a missing file, missing key or any other value means light.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppearanceConfig;

/// Storage key for the theme preference
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    /// Value written to storage
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    /// Decode a stored value; anything but `"dark"` is light
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("dark") => ThemeMode::Dark,
            _ => ThemeMode::Light,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    /// Icon for the toggle button: it offers the *other* theme
    pub fn toggle_icon(self, appearance: &AppearanceConfig) -> &str {
        match self {
            ThemeMode::Dark => &appearance.sun_icon,
            ThemeMode::Light => &appearance.moon_icon,
        }
    }
}

/// Durable key-value storage for client preferences
pub trait PreferenceStore: Send {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Preferences file format
#[derive(Debug, Serialize, Deserialize)]
struct PreferencesFile {
    version: u32,
    entries: BTreeMap<String, String>,
}

impl Default for PreferencesFile {
    fn default() -> Self {
        Self {
            version: 1,
            entries: BTreeMap::new(),
        }
    }
}

/// JSON file backed store; every `set` is written through to disk
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`, reading existing entries if present
    pub fn open(path: PathBuf) -> Result<Self> {
        let mut store = Self {
            path,
            entries: BTreeMap::new(),
        };
        store.load()?;
        Ok(store)
    }

    fn load(&mut self) -> Result<()> {
        if !self.path.exists() {
            tracing::debug!("No preferences file found, starting fresh");
            return Ok(());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read preferences from {}", self.path.display()))?;

        let file: PreferencesFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse preferences from {}", self.path.display()))?;

        self.entries = file.entries;
        tracing::debug!("Loaded {} preference entries", self.entries.len());
        Ok(())
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create preferences directory")?;
        }

        let file = PreferencesFile {
            version: 1,
            entries: self.entries.clone(),
        };

        let content =
            serde_json::to_string_pretty(&file).context("Failed to serialize preferences")?;

        fs::write(&self.path, content).context("Failed to write preferences file")?;
        Ok(())
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.save()
    }
}

/// In-memory store; clones share the same entries.
///
/// Used when the preferences file cannot be opened, so the toggle still
/// works for the session.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Current theme plus the store it is persisted to
pub struct ThemePreference {
    mode: ThemeMode,
    store: Box<dyn PreferenceStore>,
}

impl ThemePreference {
    /// Read the persisted preference
    pub fn load(store: Box<dyn PreferenceStore>) -> Self {
        let mode = ThemeMode::from_stored(store.get(THEME_KEY).as_deref());
        tracing::debug!("Theme preference: {}", mode.as_str());
        Self { mode, store }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    /// Flip the theme and persist it. A failed write is logged; the new
    /// theme still applies for this session.
    pub fn toggle(&mut self) -> ThemeMode {
        self.mode = self.mode.toggle();
        if let Err(e) = self.store.set(THEME_KEY, self.mode.as_str()) {
            tracing::warn!("Failed to persist theme preference: {:#}", e);
        }
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_stored() {
        assert_eq!(ThemeMode::from_stored(Some("dark")), ThemeMode::Dark);
        assert_eq!(ThemeMode::from_stored(Some("light")), ThemeMode::Light);
        assert_eq!(ThemeMode::from_stored(Some("Dark")), ThemeMode::Light);
        assert_eq!(ThemeMode::from_stored(Some("solarized")), ThemeMode::Light);
        assert_eq!(ThemeMode::from_stored(None), ThemeMode::Light);
    }

    #[test]
    fn test_icon_offers_other_theme() {
        let appearance = AppearanceConfig::default();
        assert_eq!(ThemeMode::Dark.toggle_icon(&appearance), appearance.sun_icon);
        assert_eq!(ThemeMode::Light.toggle_icon(&appearance), appearance.moon_icon);
    }

    #[test]
    fn test_toggle_persists() {
        let store = MemoryStore::default();
        let mut pref = ThemePreference::load(Box::new(store.clone()));
        assert_eq!(pref.mode(), ThemeMode::Light);

        assert_eq!(pref.toggle(), ThemeMode::Dark);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));
    }

    #[test]
    fn test_toggle_twice_restores_value_and_icon() {
        let appearance = AppearanceConfig::default();
        let mut store = MemoryStore::default();
        store.set(THEME_KEY, "dark").unwrap();

        let mut pref = ThemePreference::load(Box::new(store.clone()));
        let icon = pref.mode().toggle_icon(&appearance).to_string();

        pref.toggle();
        pref.toggle();

        assert_eq!(pref.mode(), ThemeMode::Dark);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(pref.mode().toggle_icon(&appearance), icon);
    }

    #[test]
    fn test_file_store_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");

        let store = FileStore::open(path.clone()).unwrap();
        let mut pref = ThemePreference::load(Box::new(store));
        pref.toggle();

        let reopened = FileStore::open(path).unwrap();
        assert_eq!(reopened.get(THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(ThemePreference::load(Box::new(reopened)).mode(), ThemeMode::Dark);
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "not json").unwrap();

        assert!(FileStore::open(path).is_err());
    }
}
