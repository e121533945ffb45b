use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::clock::Clock;
use crate::error::{AppError, Result};
use crate::scheduler::Scheduler;
use crate::settings::SettingsProvider;

use super::reminder_models::{
    CreateReminderRequest, Reminder, ReminderStats, UpdateReminderRequest,
};
use super::reminder_repository::ReminderStore;

/// Reminder CRUD plus the actions offered on an alert (snooze, complete,
/// dismiss), keeping the scheduler's notification state in step.
#[derive(Clone)]
pub struct ReminderService {
    store: Arc<dyn ReminderStore>,
    settings: Arc<dyn SettingsProvider>,
    scheduler: Arc<Scheduler>,
    clock: Arc<dyn Clock>,
}

impl ReminderService {
    pub fn new(
        store: Arc<dyn ReminderStore>,
        settings: Arc<dyn SettingsProvider>,
        scheduler: Arc<Scheduler>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            settings,
            scheduler,
            clock,
        }
    }

    pub fn list(&self) -> Result<Vec<Reminder>> {
        self.store.list_all()
    }

    pub fn get(&self, id: &str) -> Result<Reminder> {
        self.store
            .find_by_id(id)?
            .ok_or_else(|| AppError::NotFound("Reminder not found".into()))
    }

    pub fn create(&self, payload: CreateReminderRequest) -> Result<Reminder> {
        payload.validate()?;
        let now = self.clock.now();
        let reminder = Reminder {
            id: Uuid::new_v4().to_string(),
            title: payload.title,
            description: payload.description,
            date_time: payload.date_time,
            category: payload.category,
            completed: false,
            snoozed_until: None,
            external_event_id: payload.external_event_id,
            created_at: now,
            updated_at: now,
        };
        tracing::info!(reminder_id = %reminder.id, "Created reminder: {}", reminder.title);
        self.store.insert(reminder)
    }

    pub fn update(&self, id: &str, payload: UpdateReminderRequest) -> Result<Reminder> {
        payload.validate()?;
        let current = self.get(id)?;
        let reschedule = payload.touches_schedule(&current);

        let updated = Reminder {
            title: payload.title.unwrap_or(current.title),
            description: payload.description.unwrap_or(current.description),
            date_time: payload.date_time.unwrap_or(current.date_time),
            category: payload.category.unwrap_or(current.category),
            completed: payload.completed.unwrap_or(current.completed),
            updated_at: self.clock.now(),
            ..current
        };
        self.save(updated, reschedule)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        if !self.store.delete(id)? {
            return Err(AppError::NotFound("Reminder not found".into()));
        }
        self.scheduler.reset_notification(id);
        tracing::info!(reminder_id = id, "Deleted reminder");
        Ok(())
    }

    /// Pushes the reminder `minutes` later (the configured snooze length when
    /// `None`) so it fires again at the new time.
    pub fn snooze(&self, id: &str, minutes: Option<u32>) -> Result<Reminder> {
        let minutes = match minutes {
            Some(m) => m,
            None => self.settings.get()?.notifications.snooze_time_minutes,
        };
        if minutes == 0 {
            return Err(AppError::Validation("snooze must be at least one minute".into()));
        }

        let current = self.get(id)?;
        let until = current.date_time + Duration::minutes(i64::from(minutes));
        let snoozed = Reminder {
            date_time: until,
            snoozed_until: Some(until),
            updated_at: self.clock.now(),
            ..current
        };
        tracing::info!(reminder_id = id, "Snoozed for {} minutes", minutes);
        self.save(snoozed, true)
    }

    pub fn complete(&self, id: &str) -> Result<Reminder> {
        let current = self.get(id)?;
        let completed = Reminder {
            completed: true,
            updated_at: self.clock.now(),
            ..current
        };
        self.save(completed, true)
    }

    /// Closes the alert only. The reminder stays marked as notified.
    pub fn dismiss(&self, id: &str) -> bool {
        self.scheduler.dispatcher().close(id)
    }

    fn save(&self, reminder: Reminder, reschedule: bool) -> Result<Reminder> {
        let id = reminder.id.clone();
        let saved = self
            .store
            .update(reminder)?
            .ok_or_else(|| AppError::NotFound("Reminder not found".into()))?;
        if reschedule {
            self.scheduler.reset_notification(&id);
        }
        Ok(saved)
    }

    /// Active reminder counts for today, this week (from Sunday) and this
    /// month, all in UTC.
    pub fn stats(&self) -> Result<ReminderStats> {
        let now = self.clock.now();
        let today = now.date_naive();
        let day_start = start_of(today);
        let day_end = day_start + Duration::days(1);
        let week_start = start_of(
            today - Duration::days(i64::from(today.weekday().num_days_from_sunday())),
        );
        let month_start = start_of(today - Duration::days(i64::from(today.day0())));

        let mut stats = ReminderStats::default();
        for reminder in self.store.list_all()?.iter().filter(|r| !r.completed) {
            stats.active_total += 1;
            if reminder.date_time >= day_start && reminder.date_time < day_end {
                stats.today += 1;
            }
            if reminder.date_time >= week_start {
                stats.this_week += 1;
            }
            if reminder.date_time >= month_start {
                stats.this_month += 1;
            }
        }
        Ok(stats)
    }

    pub fn upcoming(&self, limit: usize) -> Result<Vec<Reminder>> {
        let now = self.clock.now();
        let mut upcoming: Vec<Reminder> = self
            .store
            .list_all()?
            .into_iter()
            .filter(|r| !r.completed && r.date_time > now)
            .collect();
        upcoming.sort_by_key(|r| r.date_time);
        upcoming.truncate(limit);
        Ok(upcoming)
    }

    pub fn on_date(&self, date: NaiveDate) -> Result<Vec<Reminder>> {
        Ok(self
            .store
            .list_all()?
            .into_iter()
            .filter(|r| r.date_time.date_naive() == date)
            .collect())
    }
}

fn start_of(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}
