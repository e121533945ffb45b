use std::sync::Arc;
use validator::Validate;

use crate::error::Result;
use crate::scheduler::{Scheduler, SchedulerState};

use super::settings_models::{Settings, UpdateSettingsRequest};
use super::settings_repository::SettingsProvider;

#[derive(Clone)]
pub struct SettingsService {
    provider: Arc<dyn SettingsProvider>,
    scheduler: Arc<Scheduler>,
}

impl SettingsService {
    pub fn new(provider: Arc<dyn SettingsProvider>, scheduler: Arc<Scheduler>) -> Self {
        Self {
            provider,
            scheduler,
        }
    }

    pub fn get(&self) -> Result<Settings> {
        self.provider.get()
    }

    pub fn update(&self, payload: UpdateSettingsRequest) -> Result<Settings> {
        let current = self.provider.get()?;
        let updated = match &payload.notifications {
            Some(changes) => Settings {
                notifications: current.notifications.merged(changes),
                ..current.clone()
            },
            None => current.clone(),
        };
        self.apply(current, updated)
    }

    pub fn reset(&self) -> Result<Settings> {
        let current = self.provider.get()?;
        let defaults = Settings {
            extra: current.extra.clone(),
            ..Settings::default()
        };
        self.apply(current, defaults)
    }

    fn apply(&self, current: Settings, updated: Settings) -> Result<Settings> {
        updated.validate()?;
        self.provider.save(&updated)?;

        if current.notifications.enabled != updated.notifications.enabled {
            tracing::info!(
                enabled = updated.notifications.enabled,
                "Notifications toggled, clearing alert state"
            );
            self.scheduler.reset_all();
        }

        if current.notifications != updated.notifications
            && self.scheduler.state() == SchedulerState::Running
        {
            self.scheduler.start();
        }

        Ok(updated)
    }
}
