pub mod scheduler_service;
pub mod trigger;

pub use scheduler_service::{Scheduler, SchedulerState, TickOutcome, TICK_INTERVAL};
pub use trigger::{TriggerWindow, GRACE_PERIOD_SECS};
