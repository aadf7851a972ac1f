// Core layer - shared types and configuration
pub mod core;

// Features layer - reminders
pub mod features;

// UI components
pub mod message_components;

// Infrastructure
pub mod database;

// Application layer
pub mod command_handler;
pub mod commands;

pub use core::Config;

pub use features::reminders::{
    DiscordSink, ListViewStore, Recurrence, Reminder, ReminderError, ReminderScheduler,
    ReminderService, ReminderSink, TimeResolver,
};
