//! # Reminders Feature
//!
//! Scheduled reminders with optional hourly/daily recurrence, a paginated list
//! view and a polling delivery loop.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Position-based delete/repeat, list pagination, natural-language times
//! - 1.0.0: Initial scheduler

pub mod error;
pub mod model;
pub mod pagination;
pub mod scheduler;
pub mod service;
pub mod time_parser;

pub use error::ReminderError;
pub use model::{Recurrence, Reminder};
pub use pagination::{parse_button_id, ListAction, ListView, ListViewStore, PAGE_SIZE, VIEW_TIMEOUT};
pub use scheduler::{DiscordSink, ReminderScheduler, ReminderSink, TickSummary};
pub use service::ReminderService;
pub use time_parser::{ParsedReminder, TimeResolver};
