//! # Core Module
//!
//! Configuration, Discord formatting limits and shared embed builders.
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Add embeds module for reminder rendering
//! - 1.1.0: Add response module with truncation and duration formatting
//! - 1.0.0: Initial creation with config module

pub mod config;
pub mod embeds;
pub mod response;

// Re-export commonly used items
pub use config::Config;
pub use response::{
    format_duration, format_time_until, truncate_for_embed, truncate_for_field_name,
    truncate_for_message, EMBED_LIMIT, FIELD_NAME_LIMIT, MESSAGE_LIMIT,
};
