pub mod reminder_models;
pub mod reminder_repository;
pub mod reminder_service;

pub use reminder_models::{
    CreateReminderRequest, Reminder, ReminderCategory, ReminderStats, UpdateReminderRequest,
};
pub use reminder_repository::{InMemoryReminderStore, JsonReminderStore, ReminderStore};
pub use reminder_service::ReminderService;
