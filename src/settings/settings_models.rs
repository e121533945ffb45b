use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

pub const DEFAULT_SNOOZE_MINUTES: u32 = 5;
pub const DEFAULT_ADVANCE_NOTICE_MINUTES: u32 = 0;

/// Screen corner an alert is anchored to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationPosition {
    TopRight,
    #[default]
    BottomRight,
    TopLeft,
    BottomLeft,
}

impl std::fmt::Display for NotificationPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationPosition::TopRight => write!(f, "top-right"),
            NotificationPosition::BottomRight => write!(f, "bottom-right"),
            NotificationPosition::TopLeft => write!(f, "top-left"),
            NotificationPosition::BottomLeft => write!(f, "bottom-left"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    pub enabled: bool,
    pub sound_enabled: bool,
    #[validate(range(max = 1440))]
    pub advance_notice_minutes: u32,
    #[validate(range(min = 1, max = 1440))]
    pub snooze_time_minutes: u32,
    pub position: NotificationPosition,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            sound_enabled: true,
            advance_notice_minutes: DEFAULT_ADVANCE_NOTICE_MINUTES,
            snooze_time_minutes: DEFAULT_SNOOZE_MINUTES,
            position: NotificationPosition::BottomRight,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    #[validate(nested)]
    pub notifications: NotificationSettings,
    /// Sections owned by other parts of the host (`general`, `sync`, ...),
    /// carried through untouched so a save never drops them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNotificationSettingsRequest {
    pub enabled: Option<bool>,
    pub sound_enabled: Option<bool>,
    pub advance_notice_minutes: Option<u32>,
    pub snooze_time_minutes: Option<u32>,
    pub position: Option<NotificationPosition>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub notifications: Option<UpdateNotificationSettingsRequest>,
}

impl NotificationSettings {
    pub fn merged(&self, update: &UpdateNotificationSettingsRequest) -> Self {
        Self {
            enabled: update.enabled.unwrap_or(self.enabled),
            sound_enabled: update.sound_enabled.unwrap_or(self.sound_enabled),
            advance_notice_minutes: update
                .advance_notice_minutes
                .unwrap_or(self.advance_notice_minutes),
            snooze_time_minutes: update
                .snooze_time_minutes
                .unwrap_or(self.snooze_time_minutes),
            position: update.position.unwrap_or(self.position),
        }
    }
}
