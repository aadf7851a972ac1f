//! Shared context for command handlers
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 2.0.0: Carry the reminder service and list view store instead of the raw database
//! - 1.0.0: Initial implementation with core shared state

use crate::features::reminders::{ListViewStore, ReminderService};

/// Shared context for all command and component handlers
///
/// Contains:
/// - ReminderService for reminder table operations
/// - ListViewStore holding live `/list` pagination state
/// - Bot start time for `/ping` uptime
#[derive(Clone)]
pub struct CommandContext {
    pub service: ReminderService,
    pub list_views: ListViewStore,
    pub start_time: std::time::Instant,
}

impl CommandContext {
    pub fn new(service: ReminderService, list_views: ListViewStore) -> Self {
        Self {
            service,
            list_views,
            start_time: std::time::Instant::now(),
        }
    }
}
