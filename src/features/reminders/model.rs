//! Reminder domain types
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::str::FromStr;

use super::error::ReminderError;

/// Whether a fired reminder reschedules itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Recurrence {
    #[default]
    None,
    Hourly,
    Daily,
}

impl Recurrence {
    pub const ALL: [Recurrence; 3] = [Recurrence::None, Recurrence::Hourly, Recurrence::Daily];

    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::None => "none",
            Recurrence::Hourly => "hourly",
            Recurrence::Daily => "daily",
        }
    }

    /// Fixed step between firings, `None` for one-shot reminders
    pub fn interval(&self) -> Option<Duration> {
        match self {
            Recurrence::None => None,
            Recurrence::Hourly => Some(Duration::hours(1)),
            Recurrence::Daily => Some(Duration::hours(24)),
        }
    }

    /// Next due time after a firing at `due_at`
    pub fn next_due(&self, due_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.interval().map(|step| due_at + step)
    }

    pub fn is_recurring(&self) -> bool {
        !matches!(self, Recurrence::None)
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Recurrence {
    type Err = ReminderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "off" => Ok(Recurrence::None),
            "hourly" => Ok(Recurrence::Hourly),
            "daily" => Ok(Recurrence::Daily),
            other => Err(ReminderError::InvalidRecurrence(other.to_string())),
        }
    }
}

/// A stored reminder row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub id: i64,
    pub user_id: String,
    pub channel_id: String,
    pub message: String,
    pub due_at: DateTime<Utc>,
    pub recurrence: Recurrence,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_recurrence_parse() {
        assert_eq!("daily".parse::<Recurrence>().unwrap(), Recurrence::Daily);
        assert_eq!(" Hourly ".parse::<Recurrence>().unwrap(), Recurrence::Hourly);
        assert_eq!("NONE".parse::<Recurrence>().unwrap(), Recurrence::None);
        assert!(matches!(
            "weekly".parse::<Recurrence>(),
            Err(ReminderError::InvalidRecurrence(v)) if v == "weekly"
        ));
    }

    #[test]
    fn test_recurrence_round_trips_through_storage_text() {
        for recurrence in Recurrence::ALL {
            assert_eq!(recurrence.as_str().parse::<Recurrence>().unwrap(), recurrence);
        }
    }

    #[test]
    fn test_next_due_is_fixed_step_from_previous_due() {
        let due = Utc.with_ymd_and_hms(2024, 3, 30, 23, 30, 0).unwrap();
        assert_eq!(
            Recurrence::Daily.next_due(due),
            Some(Utc.with_ymd_and_hms(2024, 3, 31, 23, 30, 0).unwrap())
        );
        assert_eq!(
            Recurrence::Hourly.next_due(due),
            Some(Utc.with_ymd_and_hms(2024, 3, 31, 0, 30, 0).unwrap())
        );
        assert_eq!(Recurrence::None.next_due(due), None);
    }
}
