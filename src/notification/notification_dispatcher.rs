use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::Result;
use crate::reminder::Reminder;
use crate::settings::NotificationSettings;

use super::notification_models::{AlertPlacement, ScreenArea};
use super::notification_surface::{AlertResource, AlertSurface};

/// How long an alert stays up when nobody interacts with it.
pub const AUTO_DISMISS_AFTER: Duration = Duration::from_secs(30);

struct AlertHandle {
    resource: AlertResource,
    /// Distinguishes this handle from a later one for the same reminder.
    token: Uuid,
    timeout: JoinHandle<()>,
}

struct DispatcherInner {
    alerts: DashMap<String, AlertHandle>,
    surface: Arc<dyn AlertSurface>,
    screen: ScreenArea,
    auto_dismiss: Duration,
}

impl DispatcherInner {
    fn expire(&self, reminder_id: &str, token: Uuid) {
        if let Some((_, handle)) = self
            .alerts
            .remove_if(reminder_id, |_, handle| handle.token == token)
        {
            tracing::debug!(reminder_id, "Alert auto-dismissed");
            self.surface.release(handle.resource);
        }
    }
}

/// Owns every on-screen alert, at most one per reminder id.
///
/// `show` spawns the auto-dismiss timer, so it must run inside a Tokio runtime.
#[derive(Clone)]
pub struct NotificationDispatcher {
    inner: Arc<DispatcherInner>,
}

impl NotificationDispatcher {
    pub fn new(surface: Arc<dyn AlertSurface>, screen: ScreenArea) -> Self {
        Self::with_auto_dismiss(surface, screen, AUTO_DISMISS_AFTER)
    }

    pub fn with_auto_dismiss(
        surface: Arc<dyn AlertSurface>,
        screen: ScreenArea,
        auto_dismiss: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(DispatcherInner {
                alerts: DashMap::new(),
                surface,
                screen,
                auto_dismiss,
            }),
        }
    }

    /// Shows an alert for `reminder`. Returns `Ok(false)` when one is already up.
    ///
    /// No map guard is held while the surface runs, so a surface may call
    /// back into the dispatcher.
    pub fn show(&self, reminder: &Reminder, settings: &NotificationSettings) -> Result<bool> {
        if self.inner.alerts.contains_key(&reminder.id) {
            return Ok(false);
        }

        if settings.sound_enabled {
            self.inner.surface.play_sound();
        }

        let placement = AlertPlacement::for_corner(settings.position, self.inner.screen);
        let resource = self.inner.surface.open(reminder, placement)?;

        match self.inner.alerts.entry(reminder.id.clone()) {
            Entry::Occupied(_) => {
                // lost a race with another show for the same reminder
                self.inner.surface.release(resource);
                Ok(false)
            }
            Entry::Vacant(slot) => {
                let token = Uuid::new_v4();
                let timeout = self.spawn_auto_dismiss(reminder.id.clone(), token);
                slot.insert(AlertHandle {
                    resource,
                    token,
                    timeout,
                });
                tracing::info!(reminder_id = %reminder.id, position = %settings.position, "Showing alert");
                Ok(true)
            }
        }
    }

    fn spawn_auto_dismiss(&self, reminder_id: String, token: Uuid) -> JoinHandle<()> {
        let inner: Weak<DispatcherInner> = Arc::downgrade(&self.inner);
        let after = self.inner.auto_dismiss;
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            if let Some(inner) = inner.upgrade() {
                inner.expire(&reminder_id, token);
            }
        })
    }

    /// Closes the alert for `reminder_id`. The handle is gone when this
    /// returns even if the surface is still animating it out.
    pub fn close(&self, reminder_id: &str) -> bool {
        match self.inner.alerts.remove(reminder_id) {
            Some((_, handle)) => {
                handle.timeout.abort();
                self.inner.surface.release(handle.resource);
                tracing::debug!(reminder_id, "Alert closed");
                true
            }
            None => false,
        }
    }

    pub fn close_all(&self) {
        let ids: Vec<String> = self
            .inner
            .alerts
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        for id in ids {
            self.close(&id);
        }
    }

    pub fn is_showing(&self, reminder_id: &str) -> bool {
        self.inner.alerts.contains_key(reminder_id)
    }

    pub fn active_count(&self) -> usize {
        self.inner.alerts.len()
    }
}
