use chrono::{DateTime, Duration, Utc};

use crate::reminder::Reminder;

/// Tolerance past the nominal reminder time, covering polling granularity.
pub const GRACE_PERIOD_SECS: i64 = 60;

/// Closed interval `[date_time - advance, date_time + grace]` in which a
/// reminder may fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerWindow {
    pub opens_at: DateTime<Utc>,
    pub closes_at: DateTime<Utc>,
}

impl TriggerWindow {
    pub fn new(date_time: DateTime<Utc>, advance_notice_minutes: u32) -> Self {
        Self {
            opens_at: date_time - Duration::minutes(i64::from(advance_notice_minutes)),
            closes_at: date_time + Duration::seconds(GRACE_PERIOD_SECS),
        }
    }

    pub fn for_reminder(reminder: &Reminder, advance_notice_minutes: u32) -> Self {
        Self::new(reminder.date_time, advance_notice_minutes)
    }

    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        self.opens_at <= now && now <= self.closes_at
    }

    pub fn has_closed(&self, now: DateTime<Utc>) -> bool {
        now > self.closes_at
    }
}
