use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub appearance: AppearanceConfig,
    pub labels: LabelsConfig,
    pub storage: StorageConfig,
}

/// Remote day-data provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL; `/api/day/{key}` and `/api/note` are appended
    pub base_url: String,
    /// Per-request timeout
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// chrono pattern for the selected day line
    pub date_format: String,
    /// chrono pattern for the month heading (shown uppercased)
    pub month_format: String,
    /// Toggle icon shown while the dark theme is active
    pub sun_icon: String,
    /// Toggle icon shown while the light theme is active
    pub moon_icon: String,
}

/// User-facing strings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelsConfig {
    pub date_prefix: String,
    pub loading: String,
    pub no_events: String,
    pub no_notes: String,
    pub load_error: String,
    pub note_error: String,
    pub schedule_tab: String,
    pub notes_tab: String,
    pub note_placeholder: String,
    /// Monday first, exactly seven entries
    pub weekdays: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Overrides the preferences file under the user data dir
    pub preferences_path: Option<PathBuf>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            date_format: "%d.%m.%Y".to_string(),
            month_format: "%B %Y".to_string(),
            sun_icon: "☀".to_string(),
            moon_icon: "☾".to_string(),
        }
    }
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            date_prefix: "Date: ".to_string(),
            loading: "Loading...".to_string(),
            no_events: "No events".to_string(),
            no_notes: "No notes".to_string(),
            load_error: "Failed to load".to_string(),
            note_error: "Failed to add note".to_string(),
            schedule_tab: "Schedule".to_string(),
            notes_tab: "Notes".to_string(),
            note_placeholder: "Type a note, Enter to add".to_string(),
            weekdays: ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"]
                .iter()
                .map(|d| d.to_string())
                .collect(),
        }
    }
}

impl LabelsConfig {
    /// Weekday header names, Monday first
    pub fn weekday_names(&self) -> &[String] {
        &self.weekdays
    }

    /// Replace a weekday list that is not exactly seven names
    fn fix_weekdays(&mut self) {
        if self.weekdays.len() != 7 {
            tracing::warn!(
                "labels.weekdays needs 7 entries, got {}; using defaults",
                self.weekdays.len()
            );
            self.weekdays = Self::default().weekdays;
        }
    }
}

impl StorageConfig {
    /// Resolve the preferences file location
    pub fn preferences_path(&self) -> PathBuf {
        match &self.preferences_path {
            Some(path) => PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).as_ref()),
            None => data_dir().join("preferences.json"),
        }
    }
}

/// Per-user data directory for this app
fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("darkwall-cal")
}

/// Log file used when `--log-file` is not given. The terminal belongs to the
/// dashboard, so logs never go to stderr.
pub fn default_log_path() -> PathBuf {
    data_dir().join("dcal.log")
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(path);
        let path = Path::new(expanded.as_ref());

        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            let mut config: Self = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config from {}", path.display()))?;
            config.labels.fix_weekdays();
            Ok(config)
        } else {
            tracing::info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load("/nonexistent/darkwall-cal/config.toml").unwrap();
        assert_eq!(config.provider.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.appearance.date_format, "%d.%m.%Y");
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config: Config = toml::from_str(
            r#"
            [provider]
            base_url = "https://cal.example.org"

            [labels]
            no_notes = "Нет заметок"
            "#,
        )
        .unwrap();

        assert_eq!(config.provider.base_url, "https://cal.example.org");
        assert_eq!(config.provider.timeout_secs, 10);
        assert_eq!(config.labels.no_notes, "Нет заметок");
        assert_eq!(config.labels.no_events, "No events");
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[provider]\ntimeout_secs = 3\n").unwrap();

        let config = Config::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.provider.timeout_secs, 3);
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[provider\n").unwrap();

        assert!(Config::load(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_bad_weekdays_replaced_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[labels]\nweekdays = [\"Mon\"]\n").unwrap();

        let config = Config::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.labels.weekday_names().len(), 7);
        assert_eq!(config.labels.weekday_names()[0], "Mo");
    }

    #[test]
    fn test_custom_weekdays_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[labels]\nweekdays = [\"Пн\", \"Вт\", \"Ср\", \"Чт\", \"Пт\", \"Сб\", \"Вс\"]\n",
        )
        .unwrap();

        let config = Config::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.labels.weekday_names()[6], "Вс");
    }

    #[test]
    fn test_default_log_path_under_data_dir() {
        let path = default_log_path();
        assert!(path.ends_with("darkwall-cal/dcal.log"));
    }

    #[test]
    fn test_preferences_path_override() {
        let storage = StorageConfig {
            preferences_path: Some(PathBuf::from("/tmp/prefs.json")),
        };
        assert_eq!(storage.preferences_path(), PathBuf::from("/tmp/prefs.json"));
    }
}
