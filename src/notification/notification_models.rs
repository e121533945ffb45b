use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::reminder::Reminder;
use crate::settings::NotificationPosition;

pub const ALERT_WIDTH: u32 = 400;
pub const ALERT_HEIGHT: u32 = 280;
/// Distance kept between an alert and the screen edges.
pub const ALERT_MARGIN: u32 = 20;

/// Usable work area of the display alerts are placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenArea {
    pub width: u32,
    pub height: u32,
}

impl Default for ScreenArea {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertPlacement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl AlertPlacement {
    /// Anchors an alert to `position`, clamped to the origin on screens
    /// smaller than the alert itself.
    pub fn for_corner(position: NotificationPosition, screen: ScreenArea) -> Self {
        let right = screen.width.saturating_sub(ALERT_WIDTH + ALERT_MARGIN);
        let bottom = screen.height.saturating_sub(ALERT_HEIGHT + ALERT_MARGIN);

        let (x, y) = match position {
            NotificationPosition::TopRight => (right, ALERT_MARGIN),
            NotificationPosition::BottomRight => (right, bottom),
            NotificationPosition::TopLeft => (ALERT_MARGIN, ALERT_MARGIN),
            NotificationPosition::BottomLeft => (ALERT_MARGIN, bottom),
        };

        Self {
            x,
            y,
            width: ALERT_WIDTH,
            height: ALERT_HEIGHT,
        }
    }
}

/// Broadcast to observers each time the scheduler fires a reminder.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderTriggered {
    pub reminder: Reminder,
    pub triggered_at: DateTime<Utc>,
}
