use chrono::{DateTime, Utc};
use dashmap::DashSet;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, error, info, warn};

use crate::clock::Clock;
use crate::error::Result;
use crate::notification::{NotificationDispatcher, ReminderTriggered};
use crate::reminder::{Reminder, ReminderStore};
use crate::settings::{NotificationSettings, SettingsProvider};

use super::trigger::TriggerWindow;

pub const TICK_INTERVAL: Duration = Duration::from_secs(30);
const EVENT_CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running,
}

/// What a single evaluation pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Another pass was still in flight; this one was dropped.
    Busy,
    /// Notifications are switched off; nothing was touched.
    Disabled,
    /// Reminders or settings could not be read; nothing was touched.
    Abandoned,
    Evaluated { fired: usize, collected: usize },
}

struct EvaluationGuard<'a>(&'a AtomicBool);

impl Drop for EvaluationGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Periodic evaluator deciding which reminders are due.
///
/// Owns the set of reminder ids already surfaced in this process. Entries
/// leave that set through [`Scheduler::reset_notification`] or once the
/// reminder can no longer fire (completed, deleted, or its window has ended).
pub struct Scheduler {
    store: Arc<dyn ReminderStore>,
    settings: Arc<dyn SettingsProvider>,
    dispatcher: NotificationDispatcher,
    clock: Arc<dyn Clock>,
    notified: DashSet<String>,
    evaluating: AtomicBool,
    ticker: Mutex<Option<JoinHandle<()>>>,
    events: broadcast::Sender<ReminderTriggered>,
}

impl Scheduler {
    pub fn new(
        store: Arc<dyn ReminderStore>,
        settings: Arc<dyn SettingsProvider>,
        dispatcher: NotificationDispatcher,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store,
            settings,
            dispatcher,
            clock,
            notified: DashSet::new(),
            evaluating: AtomicBool::new(false),
            ticker: Mutex::new(None),
            events,
        }
    }

    /// Runs one pass immediately, then one every tick interval. Restarts
    /// the timer if already running.
    pub fn start(self: &Arc<Self>) {
        let mut ticker = self.ticker.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = ticker.take() {
            previous.abort();
        }

        self.tick();

        let weak: Weak<Self> = Arc::downgrade(self);
        let period = TICK_INTERVAL;
        *ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                match weak.upgrade() {
                    Some(scheduler) => {
                        scheduler.tick();
                    }
                    None => break,
                }
            }
        }));

        info!("Scheduler started, checking every {}s", period.as_secs());
    }

    pub fn stop(&self) {
        let mut ticker = self.ticker.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = ticker.take() {
            handle.abort();
            info!("Scheduler stopped");
        }
    }

    pub fn state(&self) -> SchedulerState {
        let ticker = self.ticker.lock().unwrap_or_else(|e| e.into_inner());
        match ticker.as_ref() {
            Some(handle) if !handle.is_finished() => SchedulerState::Running,
            _ => SchedulerState::Stopped,
        }
    }

    /// One evaluation pass. Never fails; problems are logged and the next
    /// tick starts over.
    pub fn tick(&self) -> TickOutcome {
        if self
            .evaluating
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            debug!("Previous evaluation still running, dropping tick");
            return TickOutcome::Busy;
        }
        let _guard = EvaluationGuard(&self.evaluating);

        match self.evaluate() {
            Ok(outcome) => outcome,
            Err(e) if e.is_transient() => {
                warn!("Abandoning reminder check, retrying next tick: {}", e);
                TickOutcome::Abandoned
            }
            Err(e) => {
                error!("Abandoning reminder check: {}", e);
                TickOutcome::Abandoned
            }
        }
    }

    fn evaluate(&self) -> Result<TickOutcome> {
        let reminders = self.store.list_all()?;
        let settings = self.settings.get()?.notifications;

        if !settings.enabled {
            debug!("Notifications disabled in settings");
            return Ok(TickOutcome::Disabled);
        }

        let now = self.clock.now();
        debug!("Checking {} reminders", reminders.len());

        let mut fired = 0;
        for reminder in &reminders {
            if reminder.completed || self.notified.contains(&reminder.id) {
                continue;
            }

            let window = TriggerWindow::for_reminder(reminder, settings.advance_notice_minutes);
            if window.contains(now) {
                self.fire(reminder, &settings, now);
                fired += 1;
            } else {
                debug!(
                    reminder_id = %reminder.id,
                    opens_at = %window.opens_at,
                    closes_at = %window.closes_at,
                    "Not due"
                );
            }
        }

        let collected = self.collect_garbage(&reminders, now);
        Ok(TickOutcome::Evaluated { fired, collected })
    }

    fn fire(&self, reminder: &Reminder, settings: &NotificationSettings, now: DateTime<Utc>) {
        info!(reminder_id = %reminder.id, "Triggering reminder: {}", reminder.title);
        self.notified.insert(reminder.id.clone());

        // the id stays marked even when the alert cannot be shown, so a
        // broken surface is not retried every tick
        if let Err(e) = self.dispatcher.show(reminder, settings) {
            warn!(reminder_id = %reminder.id, "Failed to show alert: {}", e);
        }

        // a reset that landed while the alert was opening must not leave it
        // up without a dedup entry
        if !self.notified.contains(&reminder.id) && self.dispatcher.close(&reminder.id) {
            debug!(reminder_id = %reminder.id, "Reset during show, alert closed");
        }

        let _ = self.events.send(ReminderTriggered {
            reminder: reminder.clone(),
            triggered_at: now,
        });
    }

    fn collect_garbage(&self, reminders: &[Reminder], now: DateTime<Utc>) -> usize {
        let by_id: HashMap<&str, &Reminder> =
            reminders.iter().map(|r| (r.id.as_str(), r)).collect();

        let before = self.notified.len();
        self.notified.retain(|id| {
            if self.dispatcher.is_showing(id) {
                return true;
            }
            match by_id.get(id.as_str()) {
                Some(reminder) => {
                    !reminder.completed
                        && !TriggerWindow::for_reminder(reminder, 0).has_closed(now)
                }
                None => false,
            }
        });
        before.saturating_sub(self.notified.len())
    }

    /// Makes `reminder_id` eligible again on the next tick and closes its alert.
    pub fn reset_notification(&self, reminder_id: &str) {
        self.notified.remove(reminder_id);
        self.dispatcher.close(reminder_id);
        debug!(reminder_id, "Notification state reset");
    }

    pub fn reset_all(&self) {
        self.notified.clear();
        self.dispatcher.close_all();
        debug!("All notification state reset");
    }

    pub fn is_notified(&self, reminder_id: &str) -> bool {
        self.notified.contains(reminder_id)
    }

    pub fn notified_count(&self) -> usize {
        self.notified.len()
    }

    pub fn dispatcher(&self) -> &NotificationDispatcher {
        &self.dispatcher
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ReminderTriggered> {
        self.events.subscribe()
    }

    pub fn event_stream(&self) -> BroadcastStream<ReminderTriggered> {
        BroadcastStream::new(self.events.subscribe())
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        let ticker = self.ticker.get_mut().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = ticker.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::AppError;
    use crate::notification::notification_dispatcher::tests::RecordingSurface;
    use crate::notification::ScreenArea;
    use crate::reminder::{InMemoryReminderStore, ReminderCategory};
    use crate::settings::{InMemorySettings, Settings};
    use chrono::{Duration as ChronoDuration, TimeZone};
    use futures::StreamExt;
    use std::sync::OnceLock;

    struct Harness {
        clock: Arc<ManualClock>,
        store: Arc<InMemoryReminderStore>,
        settings: Arc<InMemorySettings>,
        surface: Arc<RecordingSurface>,
        scheduler: Arc<Scheduler>,
    }

    fn start_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 20, 9, 0, 0).unwrap()
    }

    fn harness() -> Harness {
        let clock = Arc::new(ManualClock::new(start_time()));
        let store = Arc::new(InMemoryReminderStore::new());
        let settings = Arc::new(InMemorySettings::default());
        let surface = Arc::new(RecordingSurface::default());
        let dispatcher = NotificationDispatcher::new(surface.clone(), ScreenArea::default());
        let scheduler = Arc::new(Scheduler::new(
            store.clone(),
            settings.clone(),
            dispatcher,
            clock.clone(),
        ));
        Harness {
            clock,
            store,
            settings,
            surface,
            scheduler,
        }
    }

    fn add(h: &Harness, id: &str, at: DateTime<Utc>) {
        h.store
            .insert(Reminder {
                id: id.into(),
                title: format!("Reminder {}", id),
                description: String::new(),
                date_time: at,
                category: ReminderCategory::Other,
                completed: false,
                snoozed_until: None,
                external_event_id: None,
                created_at: start_time(),
                updated_at: start_time(),
            })
            .unwrap();
    }

    fn set_notifications(h: &Harness, f: impl FnOnce(&mut NotificationSettings)) {
        let mut settings = h.settings.get().unwrap();
        f(&mut settings.notifications);
        h.settings.save(&settings).unwrap();
    }

    fn secs(n: i64) -> ChronoDuration {
        ChronoDuration::seconds(n)
    }

    #[tokio::test]
    async fn test_fires_once_inside_window() {
        let h = harness();
        add(&h, "r1", start_time() + ChronoDuration::minutes(5));

        assert_eq!(
            h.scheduler.tick(),
            TickOutcome::Evaluated { fired: 0, collected: 0 }
        );

        h.clock.advance(ChronoDuration::minutes(5) + secs(1));
        assert_eq!(
            h.scheduler.tick(),
            TickOutcome::Evaluated { fired: 1, collected: 0 }
        );

        h.clock.advance(secs(30));
        assert_eq!(
            h.scheduler.tick(),
            TickOutcome::Evaluated { fired: 0, collected: 0 }
        );
        assert_eq!(h.surface.opened_ids(), vec!["r1".to_string()]);
    }

    #[tokio::test]
    async fn test_repeated_ticks_at_same_instant_are_idempotent() {
        let h = harness();
        add(&h, "r1", start_time());

        h.scheduler.tick();
        h.scheduler.dispatcher().close("r1");
        h.scheduler.tick();
        h.scheduler.tick();

        assert_eq!(h.surface.opened_ids().len(), 1);
        assert!(h.scheduler.is_notified("r1"));
    }

    #[tokio::test]
    async fn test_completed_reminders_never_fire() {
        let h = harness();
        add(&h, "done", start_time());
        let mut done = h.store.find_by_id("done").unwrap().unwrap();
        done.completed = true;
        h.store.update(done).unwrap();

        h.scheduler.tick();
        assert!(h.surface.opened_ids().is_empty());
        assert!(!h.scheduler.is_notified("done"));
    }

    #[tokio::test]
    async fn test_window_edges_with_advance_notice() {
        let h = harness();
        set_notifications(&h, |n| n.advance_notice_minutes = 10);
        let due = start_time() + ChronoDuration::minutes(10);
        add(&h, "early", due);

        h.clock.set(due - ChronoDuration::minutes(10) - secs(1));
        h.scheduler.tick();
        assert!(h.surface.opened_ids().is_empty());

        h.clock.set(due - ChronoDuration::minutes(10));
        h.scheduler.tick();
        assert_eq!(h.surface.opened_ids(), vec!["early".to_string()]);

        let h = harness();
        add(&h, "late", start_time());
        h.clock.set(start_time() + secs(61));
        h.scheduler.tick();
        assert!(h.surface.opened_ids().is_empty(), "missed windows are not backfilled");

        h.clock.set(start_time() + secs(60));
        h.scheduler.tick();
        assert_eq!(h.surface.opened_ids(), vec!["late".to_string()]);
    }

    #[tokio::test]
    async fn test_disabled_settings_touch_nothing() {
        let h = harness();
        add(&h, "a", start_time());
        add(&h, "b", start_time() + secs(30));
        h.scheduler.tick();
        assert!(h.scheduler.is_notified("a"));
        h.scheduler.dispatcher().close("a");

        set_notifications(&h, |n| n.enabled = false);
        h.clock.advance(secs(30));
        assert_eq!(h.scheduler.tick(), TickOutcome::Disabled);
        // far past every window: GC would drop "a" if it ran
        h.clock.advance(ChronoDuration::hours(1));
        assert_eq!(h.scheduler.tick(), TickOutcome::Disabled);

        assert!(h.scheduler.is_notified("a"));
        assert!(!h.scheduler.is_notified("b"));
        assert_eq!(h.surface.opened_ids().len(), 1);
    }

    #[tokio::test]
    async fn test_reset_makes_reminder_eligible_again() {
        let h = harness();
        add(&h, "r1", start_time());
        h.scheduler.tick();
        assert!(h.scheduler.dispatcher().is_showing("r1"));

        h.scheduler.reset_notification("r1");
        assert!(!h.scheduler.is_notified("r1"));
        assert!(!h.scheduler.dispatcher().is_showing("r1"));

        h.scheduler.tick();
        assert_eq!(h.surface.opened_ids().len(), 2);
    }

    #[tokio::test]
    async fn test_reset_unknown_id_is_noop() {
        let h = harness();
        h.scheduler.reset_notification("ghost");
        assert_eq!(h.scheduler.notified_count(), 0);
    }

    #[tokio::test]
    async fn test_gc_after_window_without_second_show() {
        let h = harness();
        add(&h, "r1", start_time());
        h.scheduler.tick();
        h.scheduler.dispatcher().close("r1");

        // still inside the grace period: entry must survive
        h.clock.advance(secs(45));
        assert_eq!(
            h.scheduler.tick(),
            TickOutcome::Evaluated { fired: 0, collected: 0 }
        );
        assert!(h.scheduler.is_notified("r1"));

        h.clock.advance(secs(30));
        assert_eq!(
            h.scheduler.tick(),
            TickOutcome::Evaluated { fired: 0, collected: 1 }
        );
        assert!(!h.scheduler.is_notified("r1"));

        h.scheduler.tick();
        assert_eq!(h.surface.opened_ids().len(), 1);
    }

    #[tokio::test]
    async fn test_gc_keeps_entries_with_visible_alert() {
        let h = harness();
        add(&h, "r1", start_time());
        // fires on the last second of the grace period
        h.clock.advance(secs(60));
        h.scheduler.tick();

        h.clock.advance(secs(5));
        assert_eq!(
            h.scheduler.tick(),
            TickOutcome::Evaluated { fired: 0, collected: 0 }
        );
        assert!(h.scheduler.dispatcher().is_showing("r1"));
        assert!(h.scheduler.is_notified("r1"));
    }

    #[tokio::test]
    async fn test_gc_drops_completed_and_deleted() {
        let h = harness();
        add(&h, "done", start_time());
        add(&h, "gone", start_time());
        h.scheduler.tick();
        h.scheduler.dispatcher().close_all();

        let mut done = h.store.find_by_id("done").unwrap().unwrap();
        done.completed = true;
        h.store.update(done).unwrap();
        h.store.delete("gone").unwrap();

        assert_eq!(
            h.scheduler.tick(),
            TickOutcome::Evaluated { fired: 0, collected: 2 }
        );
        assert_eq!(h.scheduler.notified_count(), 0);
    }

    struct FailingStore;

    impl ReminderStore for FailingStore {
        fn list_all(&self) -> Result<Vec<Reminder>> {
            Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "store offline",
            )))
        }
        fn find_by_id(&self, _id: &str) -> Result<Option<Reminder>> {
            Ok(None)
        }
        fn insert(&self, reminder: Reminder) -> Result<Reminder> {
            Ok(reminder)
        }
        fn update(&self, _reminder: Reminder) -> Result<Option<Reminder>> {
            Ok(None)
        }
        fn delete(&self, _id: &str) -> Result<bool> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn test_read_failure_abandons_tick() {
        let surface = Arc::new(RecordingSurface::default());
        let scheduler = Scheduler::new(
            Arc::new(FailingStore),
            Arc::new(InMemorySettings::default()),
            NotificationDispatcher::new(surface.clone(), ScreenArea::default()),
            Arc::new(ManualClock::new(start_time())),
        );
        assert_eq!(scheduler.tick(), TickOutcome::Abandoned);
        assert_eq!(scheduler.notified_count(), 0);
        // the guard was released
        assert_eq!(scheduler.tick(), TickOutcome::Abandoned);
    }

    struct UnreadableSettings;

    impl SettingsProvider for UnreadableSettings {
        fn get(&self) -> Result<Settings> {
            Err(AppError::Config("settings section malformed".into()))
        }
        fn save(&self, _settings: &Settings) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_non_transient_failure_also_abandons_tick() {
        assert!(!UnreadableSettings.get().unwrap_err().is_transient());

        let store = Arc::new(InMemoryReminderStore::new());
        let scheduler = Scheduler::new(
            store,
            Arc::new(UnreadableSettings),
            NotificationDispatcher::new(
                Arc::new(RecordingSurface::default()),
                ScreenArea::default(),
            ),
            Arc::new(ManualClock::new(start_time())),
        );
        assert_eq!(scheduler.tick(), TickOutcome::Abandoned);
        assert_eq!(scheduler.tick(), TickOutcome::Abandoned);
    }

    /// Surface that resets the reminder it is asked to open, the way a
    /// concurrent snooze would if it landed mid-show.
    #[derive(Default)]
    struct ResettingSurface {
        scheduler: OnceLock<Weak<Scheduler>>,
        recording: RecordingSurface,
    }

    impl crate::notification::AlertSurface for ResettingSurface {
        fn open(
            &self,
            reminder: &Reminder,
            placement: crate::notification::AlertPlacement,
        ) -> Result<crate::notification::AlertResource> {
            if let Some(scheduler) = self.scheduler.get().and_then(Weak::upgrade) {
                scheduler.reset_notification(&reminder.id);
            }
            self.recording.open(reminder, placement)
        }

        fn play_sound(&self) {}

        fn release(&self, resource: crate::notification::AlertResource) {
            self.recording.release(resource);
        }
    }

    #[tokio::test]
    async fn test_reset_during_show_leaves_no_orphan_alert() {
        let store = Arc::new(InMemoryReminderStore::new());
        let surface = Arc::new(ResettingSurface::default());
        let scheduler = Arc::new(Scheduler::new(
            store.clone(),
            Arc::new(InMemorySettings::default()),
            NotificationDispatcher::new(surface.clone(), ScreenArea::default()),
            Arc::new(ManualClock::new(start_time())),
        ));
        let _ = surface.scheduler.set(Arc::downgrade(&scheduler));
        store
            .insert(Reminder {
                id: "a".into(),
                title: "Standup".into(),
                description: String::new(),
                date_time: start_time(),
                category: ReminderCategory::Work,
                completed: false,
                snoozed_until: None,
                external_event_id: None,
                created_at: start_time(),
                updated_at: start_time(),
            })
            .unwrap();

        scheduler.tick();

        // every visible alert still has a dedup entry
        assert!(!scheduler.is_notified("a"));
        assert!(!scheduler.dispatcher().is_showing("a"));
        assert_eq!(surface.recording.released_ids(), vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn test_surface_failure_is_not_retried() {
        let h = harness();
        h.surface.fail_open.store(true, Ordering::SeqCst);
        add(&h, "a", start_time());
        add(&h, "b", start_time());

        assert_eq!(
            h.scheduler.tick(),
            TickOutcome::Evaluated { fired: 2, collected: 0 }
        );
        assert!(h.scheduler.is_notified("a"));
        assert!(h.scheduler.is_notified("b"));

        h.surface.fail_open.store(false, Ordering::SeqCst);
        h.clock.advance(secs(30));
        assert_eq!(
            h.scheduler.tick(),
            TickOutcome::Evaluated { fired: 0, collected: 0 }
        );
        assert!(h.surface.opened_ids().is_empty());
    }

    #[tokio::test]
    async fn test_triggered_event_is_broadcast() {
        let h = harness();
        let mut rx = h.scheduler.subscribe();
        let mut stream = h.scheduler.event_stream();
        add(&h, "r1", start_time());

        h.scheduler.tick();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.reminder.id, "r1");
        assert_eq!(event.triggered_at, start_time());

        let streamed = stream.next().await.unwrap().unwrap();
        assert_eq!(streamed.reminder.id, "r1");
    }

    /// Store that re-enters the scheduler while a pass is in flight.
    struct ReentrantStore {
        scheduler: OnceLock<Weak<Scheduler>>,
        nested: Mutex<Option<TickOutcome>>,
    }

    impl ReminderStore for ReentrantStore {
        fn list_all(&self) -> Result<Vec<Reminder>> {
            if let Some(scheduler) = self.scheduler.get().and_then(Weak::upgrade) {
                *self.nested.lock().unwrap() = Some(scheduler.tick());
            }
            Ok(Vec::new())
        }
        fn find_by_id(&self, _id: &str) -> Result<Option<Reminder>> {
            Ok(None)
        }
        fn insert(&self, reminder: Reminder) -> Result<Reminder> {
            Ok(reminder)
        }
        fn update(&self, _reminder: Reminder) -> Result<Option<Reminder>> {
            Ok(None)
        }
        fn delete(&self, _id: &str) -> Result<bool> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn test_overlapping_tick_is_dropped() {
        let store = Arc::new(ReentrantStore {
            scheduler: OnceLock::new(),
            nested: Mutex::new(None),
        });
        let scheduler = Arc::new(Scheduler::new(
            store.clone(),
            Arc::new(InMemorySettings::default()),
            NotificationDispatcher::new(
                Arc::new(RecordingSurface::default()),
                ScreenArea::default(),
            ),
            Arc::new(ManualClock::new(start_time())),
        ));
        let _ = store.scheduler.set(Arc::downgrade(&scheduler));

        assert_eq!(
            scheduler.tick(),
            TickOutcome::Evaluated { fired: 0, collected: 0 }
        );
        assert_eq!(*store.nested.lock().unwrap(), Some(TickOutcome::Busy));
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_evaluates_immediately_then_periodically() {
        let h = harness();
        add(&h, "now", start_time());
        add(&h, "soon", start_time() + ChronoDuration::minutes(1));

        h.scheduler.start();
        assert_eq!(h.scheduler.state(), SchedulerState::Running);
        assert_eq!(h.surface.opened_ids(), vec!["now".to_string()]);

        h.clock.advance(ChronoDuration::minutes(1));
        tokio::time::sleep(TICK_INTERVAL + std::time::Duration::from_secs(1)).await;
        assert!(h.scheduler.is_notified("soon"));

        h.scheduler.stop();
        h.scheduler.stop();
        assert_eq!(h.scheduler.state(), SchedulerState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_ticks_but_keeps_alerts() {
        let h = harness();
        add(&h, "now", start_time());
        add(&h, "later", start_time() + ChronoDuration::minutes(1));

        h.scheduler.start();
        h.scheduler.stop();
        assert!(h.scheduler.dispatcher().is_showing("now"));

        h.clock.advance(ChronoDuration::minutes(1));
        tokio::time::sleep(TICK_INTERVAL * 2).await;
        assert!(!h.scheduler.is_notified("later"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_does_not_duplicate_timers() {
        let h = harness();
        h.scheduler.start();
        h.scheduler.start();
        assert_eq!(h.scheduler.state(), SchedulerState::Running);

        add(&h, "r1", start_time() + ChronoDuration::minutes(1));
        h.clock.advance(ChronoDuration::minutes(1));
        tokio::time::sleep(TICK_INTERVAL + std::time::Duration::from_secs(1)).await;

        assert_eq!(h.surface.opened_ids(), vec!["r1".to_string()]);
    }

    #[tokio::test]
    async fn test_reset_all_clears_everything() {
        let h = harness();
        add(&h, "a", start_time());
        add(&h, "b", start_time());
        h.scheduler.tick();
        assert_eq!(h.scheduler.dispatcher().active_count(), 2);

        h.scheduler.reset_all();
        assert_eq!(h.scheduler.notified_count(), 0);
        assert_eq!(h.scheduler.dispatcher().active_count(), 0);

        let settings: Settings = h.settings.get().unwrap();
        assert!(settings.notifications.enabled);
    }
}
