//! TOML settings, loaded once at startup.

use std::path::{Path, PathBuf};

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::calendar::category::DEFAULT_CATEGORY;
use crate::calendar::record::RecordDefaults;
use crate::calendar::DEFAULT_LOCATION;
use crate::error::ConfigError;
use crate::liturgy::LiturgicalOptions;

pub const APP_DIR: &str = "parish-calendar";
const STORE_FILE: &str = "eventos_igreja.csv";
const LOG_FILE: &str = "parish-calendar.log";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub store: StoreSettings,
    pub parish: ParishSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// CSV file holding manual events. Defaults to the user data directory.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParishSettings {
    pub name: String,
    /// Location given to liturgical events and to manual events without one.
    pub address: String,
    /// `HH:MM` start of the patronal feast.
    pub patronal_time: String,
}

impl Default for ParishSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_LOCATION.to_string(),
            address: DEFAULT_LOCATION.to_string(),
            patronal_time: "00:00".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing` filter directive; `RUST_LOG` takes precedence.
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// `$XDG_CONFIG_HOME/parish-calendar` or the platform equivalent.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR))
}

impl Settings {
    /// Load from `explicit`, else from the config directory, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match config_dir().map(|d| d.join("config.toml")) {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        parse_time(&self.parish.patronal_time).ok_or_else(|| ConfigError::Invalid {
            field: "parish.patronal_time",
            value: self.parish.patronal_time.clone(),
        })?;
        if self.parish.address.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "parish.address",
                value: self.parish.address.clone(),
            });
        }
        Ok(())
    }

    pub fn store_path(&self) -> PathBuf {
        if let Some(path) = &self.store.path {
            return path.clone();
        }
        dirs::data_dir()
            .map(|d| d.join(APP_DIR).join(STORE_FILE))
            .unwrap_or_else(|| PathBuf::from(STORE_FILE))
    }

    /// Log file for the terminal UI, next to the store.
    pub fn log_path(&self) -> PathBuf {
        let store = self.store_path();
        match store.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.join(LOG_FILE),
            _ => PathBuf::from(LOG_FILE),
        }
    }

    pub fn liturgical_options(&self) -> LiturgicalOptions {
        let defaults = LiturgicalOptions::default();
        LiturgicalOptions {
            location: self.parish.address.clone(),
            patronal_time: parse_time(&self.parish.patronal_time).unwrap_or(defaults.patronal_time),
        }
    }

    pub fn record_defaults(&self) -> RecordDefaults {
        RecordDefaults {
            location: self.parish.address.clone(),
            category: DEFAULT_CATEGORY.to_string(),
        }
    }
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_means_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.liturgical_options(), LiturgicalOptions::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [parish]
            patronal_time = "19:00"
            "#,
        )
        .unwrap();
        assert_eq!(settings.parish.address, DEFAULT_LOCATION);
        assert_eq!(
            settings.liturgical_options().patronal_time,
            NaiveTime::from_hms_opt(19, 0, 0).unwrap()
        );
        assert_eq!(settings.log.level, "info");
    }

    #[test]
    fn explicit_store_path_and_log_next_to_it() {
        let settings: Settings = toml::from_str(
            r#"
            [store]
            path = "/srv/paroquia/eventos.csv"
            "#,
        )
        .unwrap();
        assert_eq!(settings.store_path(), PathBuf::from("/srv/paroquia/eventos.csv"));
        assert_eq!(settings.log_path(), PathBuf::from("/srv/paroquia/parish-calendar.log"));
    }

    #[test]
    fn invalid_patronal_time_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[parish]\npatronal_time = \"7pm\"\n").unwrap();

        let err = Settings::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "parish.patronal_time", .. }));
    }
}
