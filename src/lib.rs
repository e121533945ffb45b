pub mod clock;
pub mod error;
pub mod notification;
pub mod reminder;
pub mod scheduler;
pub mod settings;
pub mod state;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{AppError, Result};
pub use scheduler::Scheduler;
pub use state::{AppState, Config};
