//! # Features
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

pub mod reminders;

pub use reminders::{ReminderScheduler, ReminderService};
