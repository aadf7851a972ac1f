//! Reminder operations behind the slash commands
//!
//! Positions are 1-based indexes into the owner's reminders ordered by due
//! time, the same order `/list` shows.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Optional recurrence on add, delete by id for list view buttons
//! - 1.0.0: Add, list, delete by position, set recurrence

use chrono::{DateTime, Utc};
use log::info;

use super::error::ReminderError;
use super::model::{Recurrence, Reminder};
use super::time_parser::TimeResolver;
use crate::database::Database;

#[derive(Clone)]
pub struct ReminderService {
    database: Database,
    resolver: TimeResolver,
}

impl ReminderService {
    pub fn new(database: Database, resolver: TimeResolver) -> Self {
        Self { database, resolver }
    }

    /// Parse `text` (message followed by a time) and store a new reminder
    pub async fn add(
        &self,
        user_id: &str,
        channel_id: &str,
        text: &str,
        recurrence: Recurrence,
        now: DateTime<Utc>,
    ) -> Result<Reminder, ReminderError> {
        let parsed = self.resolver.split(text, now)?;

        let id = self
            .database
            .add_reminder(user_id, channel_id, &parsed.message, parsed.due_at, recurrence)
            .await?;

        info!(
            "Created reminder {id} for user {user_id} in channel {channel_id} due {} ({recurrence})",
            parsed.due_at
        );

        Ok(Reminder {
            id,
            user_id: user_id.to_string(),
            channel_id: channel_id.to_string(),
            message: parsed.message,
            due_at: parsed.due_at,
            recurrence,
        })
    }

    /// The owner's reminders, soonest first
    pub async fn list(&self, user_id: &str) -> Result<Vec<Reminder>, ReminderError> {
        Ok(self.database.get_user_reminders(user_id).await?)
    }

    /// Delete the reminder shown at `position` in `/list`
    pub async fn delete_at(&self, user_id: &str, position: i64) -> Result<Reminder, ReminderError> {
        let reminder = self.resolve_position(user_id, position).await?;
        self.database.delete_reminder(reminder.id, user_id).await?;
        info!("Deleted reminder {} (position {position}) for user {user_id}", reminder.id);
        Ok(reminder)
    }

    /// Delete by id, only if the reminder belongs to `user_id`
    pub async fn delete_by_id(&self, user_id: &str, id: i64) -> Result<bool, ReminderError> {
        let deleted = self.database.delete_reminder(id, user_id).await?;
        if deleted {
            info!("Deleted reminder {id} for user {user_id}");
        }
        Ok(deleted)
    }

    /// Set the recurrence of the reminder shown at `position` in `/list`
    pub async fn set_repeat(
        &self,
        user_id: &str,
        position: i64,
        interval: &str,
    ) -> Result<Reminder, ReminderError> {
        let recurrence: Recurrence = interval.parse()?;
        let mut reminder = self.resolve_position(user_id, position).await?;

        self.database.set_recurrence(reminder.id, recurrence).await?;
        info!(
            "Reminder {} for user {user_id} now repeats {recurrence}",
            reminder.id
        );

        reminder.recurrence = recurrence;
        Ok(reminder)
    }

    async fn resolve_position(&self, user_id: &str, position: i64) -> Result<Reminder, ReminderError> {
        let mut reminders = self.database.get_user_reminders(user_id).await?;
        let count = reminders.len();

        match usize::try_from(position) {
            Ok(p) if p >= 1 && p <= count => Ok(reminders.swap_remove(p - 1)),
            _ => Err(ReminderError::PositionOutOfRange { position, count }),
        }
    }
}
