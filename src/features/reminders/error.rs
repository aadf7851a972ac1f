//! User-facing reminder errors
//!
//! Everything except `Storage` is reported back to the user and leaves the
//! table untouched.

/// Why a reminder operation was refused
#[derive(Debug, thiserror::Error)]
pub enum ReminderError {
    #[error("couldn't work out a future time from `{0}`")]
    UnresolvedTime(String),
    #[error("there is no reminder #{position} (you have {count})")]
    PositionOutOfRange { position: i64, count: usize },
    #[error("`{0}` is not a repeat interval, use daily, hourly or none")]
    InvalidRecurrence(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl ReminderError {
    /// True for errors caused by user input rather than the bot
    pub fn is_user_error(&self) -> bool {
        !matches!(self, ReminderError::Storage(_))
    }
}
