use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderCategory {
    #[default]
    Personal,
    Work,
    Health,
    Other,
}

impl std::fmt::Display for ReminderCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReminderCategory::Personal => write!(f, "personal"),
            ReminderCategory::Work => write!(f, "work"),
            ReminderCategory::Health => write!(f, "health"),
            ReminderCategory::Other => write!(f, "other"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date_time: DateTime<Utc>,
    #[serde(default)]
    pub category: ReminderCategory,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snoozed_until: Option<DateTime<Utc>>,
    /// Id of the calendar event this reminder was imported from, if any.
    #[serde(
        rename = "googleEventId",
        alias = "externalEventId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub external_event_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReminderRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date_time: DateTime<Utc>,
    #[serde(default)]
    pub category: ReminderCategory,
    #[serde(default, alias = "googleEventId")]
    pub external_event_id: Option<String>,
}

/// Partial update; `None` fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReminderRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub date_time: Option<DateTime<Utc>>,
    pub category: Option<ReminderCategory>,
    pub completed: Option<bool>,
}

impl UpdateReminderRequest {
    /// Whether applying this update changes anything the scheduler keys on.
    pub fn touches_schedule(&self, current: &Reminder) -> bool {
        self.date_time.is_some_and(|dt| dt != current.date_time)
            || self.completed.is_some_and(|c| c != current.completed)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderStats {
    pub today: usize,
    pub this_week: usize,
    pub this_month: usize,
    pub active_total: usize,
}
