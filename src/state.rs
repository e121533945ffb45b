use std::path::PathBuf;
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::error::{AppError, Result};
use crate::notification::{AlertSurface, NotificationDispatcher, ScreenArea};
use crate::reminder::{JsonReminderStore, ReminderService, ReminderStore};
use crate::scheduler::Scheduler;
use crate::settings::{JsonSettingsStore, SettingsProvider, SettingsService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub scheduler: Arc<Scheduler>,
    pub reminder_service: ReminderService,
    pub settings_service: SettingsService,
}

impl AppState {
    /// Wires file-backed stores in the configured data directory to a
    /// scheduler rendering through `surface`.
    pub fn build(config: Config, surface: Arc<dyn AlertSurface>) -> Self {
        let store: Arc<dyn ReminderStore> =
            Arc::new(JsonReminderStore::new(config.reminders_path()));
        let settings: Arc<dyn SettingsProvider> =
            Arc::new(JsonSettingsStore::new(config.settings_path()));
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let dispatcher = NotificationDispatcher::new(surface, config.screen);
        let scheduler = Arc::new(Scheduler::new(
            store.clone(),
            settings.clone(),
            dispatcher,
            clock.clone(),
        ));

        Self {
            reminder_service: ReminderService::new(
                store,
                settings.clone(),
                scheduler.clone(),
                clock,
            ),
            settings_service: SettingsService::new(settings, scheduler.clone()),
            scheduler,
            config: Arc::new(config),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub screen: ScreenArea,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = ScreenArea::default();
        Ok(Self {
            data_dir: lookup("REMINDER_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./data")),
            screen: ScreenArea {
                width: parse_or(&lookup, "SCREEN_WIDTH", defaults.width)?,
                height: parse_or(&lookup, "SCREEN_HEIGHT", defaults.height)?,
            },
        })
    }

    pub fn reminders_path(&self) -> PathBuf {
        self.data_dir.join("reminders.json")
    }

    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join("settings.json")
    }
}

fn parse_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u32) -> Result<u32> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a positive number", key))),
        None => Ok(default),
    }
}
