use crate::error::Result;
use crate::reminder::reminder_repository::write_atomically;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::RwLock;

use super::settings_models::Settings;

/// Current application configuration, read fresh on every scheduler tick.
pub trait SettingsProvider: Send + Sync {
    fn get(&self) -> Result<Settings>;

    fn save(&self, settings: &Settings) -> Result<()>;
}

#[derive(Default)]
pub struct InMemorySettings {
    settings: RwLock<Settings>,
}

impl InMemorySettings {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }
}

impl SettingsProvider for InMemorySettings {
    fn get(&self) -> Result<Settings> {
        Ok(self
            .settings
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        *self.settings.write().unwrap_or_else(|e| e.into_inner()) = settings.clone();
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    settings: Settings,
}

/// Settings persisted as `{"settings": {...}}`; a missing file yields defaults.
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SettingsProvider for JsonSettingsStore {
    fn get(&self) -> Result<Settings> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(Settings::default()),
            Ok(raw) => {
                let file: SettingsFile = serde_json::from_str(&raw)?;
                Ok(file.settings)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Settings::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        let json = serde_json::to_string_pretty(&SettingsFile {
            settings: settings.clone(),
        })?;
        write_atomically(&self.path, &json)
    }
}
