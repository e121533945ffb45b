use std::io::Write;
use std::time::Duration;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::reminder::Reminder;

use super::notification_models::AlertPlacement;

/// Opaque token for one rendered alert, issued by an [`AlertSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertResource {
    pub id: Uuid,
    pub reminder_id: String,
    pub placement: AlertPlacement,
}

/// Whatever actually puts an alert in front of the user.
pub trait AlertSurface: Send + Sync {
    fn open(&self, reminder: &Reminder, placement: AlertPlacement) -> Result<AlertResource>;

    fn play_sound(&self);

    /// Starts tearing the alert down. Implementations may keep animating
    /// after this returns; the dispatcher has already forgotten the handle.
    fn release(&self, resource: AlertResource);
}

const FADE_STEPS: u32 = 10;
const FADE_STEP: Duration = Duration::from_millis(30);

/// Renders alerts as log lines on the terminal.
#[derive(Debug, Default)]
pub struct ConsoleSurface;

impl AlertSurface for ConsoleSurface {
    fn open(&self, reminder: &Reminder, placement: AlertPlacement) -> Result<AlertResource> {
        writeln!(
            std::io::stdout().lock(),
            "\n[{}] {} ({})\n{}",
            reminder.category,
            reminder.title,
            reminder.date_time.format("%Y-%m-%d %H:%M UTC"),
            reminder.description
        )
        .map_err(|e| AppError::AlertSurface(e.to_string()))?;

        tracing::info!(
            reminder_id = %reminder.id,
            x = placement.x,
            y = placement.y,
            "Alert opened for {}",
            reminder.title
        );

        Ok(AlertResource {
            id: Uuid::new_v4(),
            reminder_id: reminder.id.clone(),
            placement,
        })
    }

    fn play_sound(&self) {
        let mut stdout = std::io::stdout().lock();
        let _ = stdout.write_all(b"\x07");
        let _ = stdout.flush();
    }

    fn release(&self, resource: AlertResource) {
        tracing::debug!(reminder_id = %resource.reminder_id, "Alert fading out");
        let fade = async move {
            tokio::time::sleep(FADE_STEP * FADE_STEPS).await;
            tracing::info!(reminder_id = %resource.reminder_id, "Alert closed");
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(fade);
            }
            Err(_) => tracing::debug!("No runtime for fade-out, alert closed immediately"),
        }
    }
}
