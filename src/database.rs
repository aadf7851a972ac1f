//! SQLite persistence for reminders
//!
//! One connection is opened at startup and shared behind an async mutex; every
//! method holds the lock only for its own statements.
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 2.0.0: Store due times as UNIX seconds, add recurrence column and indexes
//! - 1.0.0: Initial reminders table

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use log::{debug, info};
use sqlite::{Connection, State, Statement};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::features::reminders::{Recurrence, Reminder};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS reminders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        channel_id TEXT NOT NULL,
        message TEXT NOT NULL,
        due_at INTEGER NOT NULL,
        recurrence TEXT NOT NULL DEFAULT 'none',
        created_at INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_reminders_due_at ON reminders (due_at);
    CREATE INDEX IF NOT EXISTS idx_reminders_user_id ON reminders (user_id);
";

const REMINDER_COLUMNS: &str = "id, user_id, channel_id, message, due_at, recurrence";

#[derive(Clone)]
pub struct Database {
    connection: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database at `database_path`. `:memory:` works for tests.
    pub async fn new(database_path: &str) -> Result<Self> {
        let connection = sqlite::open(database_path)
            .with_context(|| format!("Failed to open database at {database_path}"))?;

        let database = Database {
            connection: Arc::new(Mutex::new(connection)),
        };
        database.init_tables().await?;

        info!("🗄️ Database ready at {database_path}");
        Ok(database)
    }

    async fn init_tables(&self) -> Result<()> {
        let conn = self.connection.lock().await;
        conn.execute(SCHEMA)
            .context("Failed to create reminders table")?;
        Ok(())
    }

    /// Insert a reminder and return its id
    pub async fn add_reminder(
        &self,
        user_id: &str,
        channel_id: &str,
        message: &str,
        due_at: DateTime<Utc>,
        recurrence: Recurrence,
    ) -> Result<i64> {
        let conn = self.connection.lock().await;

        let mut statement = conn.prepare(
            "INSERT INTO reminders (user_id, channel_id, message, due_at, recurrence, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )?;
        statement.bind((1, user_id))?;
        statement.bind((2, channel_id))?;
        statement.bind((3, message))?;
        statement.bind((4, due_at.timestamp()))?;
        statement.bind((5, recurrence.as_str()))?;
        statement.bind((6, Utc::now().timestamp()))?;
        statement.next()?;

        let mut statement = conn.prepare("SELECT last_insert_rowid() AS id")?;
        let id = match statement.next()? {
            State::Row => statement.read::<i64, _>("id")?,
            State::Done => return Err(anyhow!("SQLite returned no row id after insert")),
        };

        debug!("Inserted reminder {id} for user {user_id} due at {due_at}");
        Ok(id)
    }

    /// Fetch a single reminder by id
    pub async fn get_reminder(&self, id: i64) -> Result<Option<Reminder>> {
        let conn = self.connection.lock().await;
        let mut statement =
            conn.prepare(format!("SELECT {REMINDER_COLUMNS} FROM reminders WHERE id = ?"))?;
        statement.bind((1, id))?;

        match statement.next()? {
            State::Row => Ok(Some(read_reminder(&statement)?)),
            State::Done => Ok(None),
        }
    }

    /// All reminders owned by `user_id`, soonest first (ties by id)
    pub async fn get_user_reminders(&self, user_id: &str) -> Result<Vec<Reminder>> {
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare(format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders WHERE user_id = ? ORDER BY due_at ASC, id ASC"
        ))?;
        statement.bind((1, user_id))?;
        read_all(&mut statement)
    }

    /// Reminders whose due time is at or before `now`, soonest first
    pub async fn get_due_reminders(&self, now: DateTime<Utc>) -> Result<Vec<Reminder>> {
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare(format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders WHERE due_at <= ? ORDER BY due_at ASC, id ASC"
        ))?;
        statement.bind((1, now.timestamp()))?;
        read_all(&mut statement)
    }

    /// Move a reminder to a new due time. Returns false if the row is gone.
    pub async fn reschedule_reminder(&self, id: i64, due_at: DateTime<Utc>) -> Result<bool> {
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare("UPDATE reminders SET due_at = ? WHERE id = ?")?;
        statement.bind((1, due_at.timestamp()))?;
        statement.bind((2, id))?;
        statement.next()?;
        Ok(conn.change_count() > 0)
    }

    /// Change a reminder's recurrence. Returns false if the row is gone.
    pub async fn set_recurrence(&self, id: i64, recurrence: Recurrence) -> Result<bool> {
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare("UPDATE reminders SET recurrence = ? WHERE id = ?")?;
        statement.bind((1, recurrence.as_str()))?;
        statement.bind((2, id))?;
        statement.next()?;
        Ok(conn.change_count() > 0)
    }

    /// Delete a reminder if it belongs to `user_id`
    pub async fn delete_reminder(&self, id: i64, user_id: &str) -> Result<bool> {
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare("DELETE FROM reminders WHERE id = ? AND user_id = ?")?;
        statement.bind((1, id))?;
        statement.bind((2, user_id))?;
        statement.next()?;
        Ok(conn.change_count() > 0)
    }

    /// Delete a reminder regardless of owner (used once a one-shot reminder fires)
    pub async fn remove_reminder(&self, id: i64) -> Result<bool> {
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare("DELETE FROM reminders WHERE id = ?")?;
        statement.bind((1, id))?;
        statement.next()?;
        Ok(conn.change_count() > 0)
    }
}

fn read_all(statement: &mut Statement<'_>) -> Result<Vec<Reminder>> {
    let mut reminders = Vec::new();
    while let State::Row = statement.next()? {
        reminders.push(read_reminder(statement)?);
    }
    Ok(reminders)
}

fn read_reminder(statement: &Statement<'_>) -> Result<Reminder> {
    let id = statement.read::<i64, _>("id")?;
    let due_secs = statement.read::<i64, _>("due_at")?;
    let due_at = Utc
        .timestamp_opt(due_secs, 0)
        .single()
        .ok_or_else(|| anyhow!("Reminder {id} has an invalid due time {due_secs}"))?;
    let recurrence = statement
        .read::<String, _>("recurrence")?
        .parse::<Recurrence>()
        .map_err(|e| anyhow!("Reminder {id} has a corrupt recurrence: {e}"))?;

    Ok(Reminder {
        id,
        user_id: statement.read::<String, _>("user_id")?,
        channel_id: statement.read::<String, _>("channel_id")?,
        message: statement.read::<String, _>("message")?,
        due_at,
        recurrence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, min, 0).unwrap()
    }

    async fn memory_db() -> Database {
        Database::new(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_add_and_get_reminder() {
        let db = memory_db().await;
        let id = db
            .add_reminder("u1", "c1", "standup", at(9, 0), Recurrence::Daily)
            .await
            .unwrap();

        let reminder = db.get_reminder(id).await.unwrap().unwrap();
        assert_eq!(reminder.user_id, "u1");
        assert_eq!(reminder.channel_id, "c1");
        assert_eq!(reminder.message, "standup");
        assert_eq!(reminder.due_at, at(9, 0));
        assert_eq!(reminder.recurrence, Recurrence::Daily);
        assert!(db.get_reminder(id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let db = memory_db().await;
        let a = db.add_reminder("u1", "c1", "a", at(9, 0), Recurrence::None).await.unwrap();
        let b = db.add_reminder("u1", "c1", "b", at(9, 0), Recurrence::None).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_user_reminders_are_ordered_by_due_time() {
        let db = memory_db().await;
        db.add_reminder("u1", "c1", "late", at(18, 0), Recurrence::None).await.unwrap();
        db.add_reminder("u1", "c1", "early", at(8, 0), Recurrence::None).await.unwrap();
        db.add_reminder("u2", "c1", "other user", at(7, 0), Recurrence::None).await.unwrap();
        db.add_reminder("u1", "c1", "mid", at(12, 0), Recurrence::None).await.unwrap();

        let messages: Vec<String> = db
            .get_user_reminders("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.message)
            .collect();
        assert_eq!(messages, vec!["early", "mid", "late"]);
    }

    #[tokio::test]
    async fn test_due_reminders_include_exact_instant() {
        let db = memory_db().await;
        db.add_reminder("u1", "c1", "past", at(9, 0), Recurrence::None).await.unwrap();
        db.add_reminder("u1", "c1", "now", at(10, 0), Recurrence::None).await.unwrap();
        db.add_reminder("u1", "c1", "future", at(10, 1), Recurrence::None).await.unwrap();

        let due = db.get_due_reminders(at(10, 0)).await.unwrap();
        let messages: Vec<&str> = due.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["past", "now"]);
    }

    #[tokio::test]
    async fn test_reschedule_and_set_recurrence() {
        let db = memory_db().await;
        let id = db.add_reminder("u1", "c1", "water", at(9, 0), Recurrence::None).await.unwrap();

        assert!(db.reschedule_reminder(id, at(9, 0) + Duration::hours(1)).await.unwrap());
        assert!(db.set_recurrence(id, Recurrence::Hourly).await.unwrap());

        let reminder = db.get_reminder(id).await.unwrap().unwrap();
        assert_eq!(reminder.due_at, at(10, 0));
        assert_eq!(reminder.recurrence, Recurrence::Hourly);

        assert!(!db.reschedule_reminder(999, at(9, 0)).await.unwrap());
        assert!(!db.set_recurrence(999, Recurrence::Daily).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_reminder_checks_owner() {
        let db = memory_db().await;
        let id = db.add_reminder("u1", "c1", "mine", at(9, 0), Recurrence::None).await.unwrap();

        assert!(!db.delete_reminder(id, "u2").await.unwrap());
        assert!(db.get_reminder(id).await.unwrap().is_some());

        assert!(db.delete_reminder(id, "u1").await.unwrap());
        assert!(db.get_reminder(id).await.unwrap().is_none());
        assert!(!db.remove_reminder(id).await.unwrap());
    }
}
