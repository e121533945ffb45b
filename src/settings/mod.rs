pub mod settings_models;
pub mod settings_repository;
pub mod settings_service;

pub use settings_models::{
    NotificationPosition, NotificationSettings, Settings, UpdateNotificationSettingsRequest,
    UpdateSettingsRequest,
};
pub use settings_repository::{InMemorySettings, JsonSettingsStore, SettingsProvider};
pub use settings_service::SettingsService;
