// Declare submodules
pub mod notification_dispatcher;
pub mod notification_models;
pub mod notification_surface;

// Re-export public items
pub use notification_dispatcher::{NotificationDispatcher, AUTO_DISMISS_AFTER};
pub use notification_models::{AlertPlacement, ReminderTriggered, ScreenArea};
pub use notification_surface::{AlertResource, AlertSurface, ConsoleSurface};
