//! Due-time resolution for `/add`
//!
//! The time is taken from the end of the command text: `standup 10m`,
//! `pay rent tomorrow 9:30`, `stretch 1h30m`.
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.2.0: Spelled-out offsets (`in 3 hours`), due times stored at whole seconds
//! - 1.1.0: Accept the unit letter anywhere in compact offsets (`m10`)
//! - 1.0.0: Compact offsets, compound durations, natural-language fallback

use chrono::{DateTime, Duration, FixedOffset, Timelike, Utc};
use chrono_english::{parse_date_string, Dialect};
use regex::Regex;
use std::sync::OnceLock;

use super::error::ReminderError;

/// Message used when the command text contains only a time
pub const UNTITLED: &str = "Untitled";

/// Longest digit run accepted in an offset, keeps `now + offset` in range
const MAX_OFFSET_DIGITS: usize = 6;

static COMPOUND_DURATION: OnceLock<Regex> = OnceLock::new();
static COMPOUND_PART: OnceLock<Regex> = OnceLock::new();
static SPELLED_OFFSET: OnceLock<Regex> = OnceLock::new();

fn compound_duration() -> &'static Regex {
    COMPOUND_DURATION.get_or_init(|| {
        Regex::new(r"^(?:\d{1,6}[smhdw])+$").expect("compound duration pattern is valid")
    })
}

fn compound_part() -> &'static Regex {
    COMPOUND_PART.get_or_init(|| {
        Regex::new(r"(\d{1,6})([smhdw])").expect("compound part pattern is valid")
    })
}

fn spelled_offset() -> &'static Regex {
    SPELLED_OFFSET.get_or_init(|| {
        Regex::new(r"^(\d{1,6})\s*(minutes?|mins?|hours?|hrs?|days?|weeks?)$")
            .expect("spelled offset pattern is valid")
    })
}

/// Message text and due time split out of an `/add` command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReminder {
    pub message: String,
    pub due_at: DateTime<Utc>,
}

/// Resolves free-form time text into an absolute instant
#[derive(Debug, Clone, Copy)]
pub struct TimeResolver {
    offset: FixedOffset,
}

impl TimeResolver {
    /// `offset` is the zone natural-language times ("tomorrow 9:00") are read in
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Split `text` into a message and a strictly-future due time.
    ///
    /// Suffixes of the word list are tried longest first; the first one that
    /// resolves to a future instant wins and everything before it is the message.
    pub fn split(&self, text: &str, now: DateTime<Utc>) -> Result<ParsedReminder, ReminderError> {
        let words: Vec<&str> = text.split_whitespace().collect();

        for start in 0..words.len() {
            let candidate = words[start..].join(" ");
            if let Some(due_at) = self.resolve_future(&candidate, now) {
                let message = words[..start].join(" ");
                let message = if message.is_empty() {
                    UNTITLED.to_string()
                } else {
                    message
                };
                return Ok(ParsedReminder { message, due_at });
            }
        }

        Err(ReminderError::UnresolvedTime(text.trim().to_string()))
    }

    /// Resolve `candidate`, keeping the result only if it is after `now`
    pub fn resolve_future(&self, candidate: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.resolve(candidate, now).filter(|due_at| *due_at > now)
    }

    /// Resolve `candidate` to an instant, which may lie in the past.
    ///
    /// Results are cut to whole seconds, the precision reminders are stored at.
    pub fn resolve(&self, candidate: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let candidate = strip_in(candidate);
        let offset = parse_compact_offset(candidate)
            .or_else(|| parse_compound(candidate))
            .or_else(|| parse_spelled(candidate));

        let due_at = match offset {
            Some(offset) => now.checked_add_signed(offset)?,
            None => self.parse_natural(candidate, now)?,
        };
        due_at.with_nanosecond(0)
    }

    fn parse_natural(&self, candidate: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let local_now = now.with_timezone(&self.offset);
        let parsed = parse_date_string(candidate, local_now, Dialect::Uk).ok()?;

        // A bare time of day that already passed today means tomorrow
        if parsed <= local_now && parsed.date_naive() == local_now.date_naive() {
            return parsed
                .checked_add_signed(Duration::days(1))
                .map(|dt| dt.with_timezone(&Utc));
        }

        Some(parsed.with_timezone(&Utc))
    }
}

/// `<n>h`, `<n>m` or `<n>d` with the unit letter anywhere in the token
fn parse_compact_offset(token: &str) -> Option<Duration> {
    let token = token.trim().to_lowercase();
    let mut unit = None;
    let mut digits = String::new();

    for c in token.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else if matches!(c, 'h' | 'm' | 'd') && unit.is_none() {
            unit = Some(c);
        } else {
            return None;
        }
    }

    if digits.is_empty() || digits.len() > MAX_OFFSET_DIGITS {
        return None;
    }
    let value: i64 = digits.parse().ok()?;

    match unit? {
        'h' => Some(Duration::hours(value)),
        'm' => Some(Duration::minutes(value)),
        'd' => Some(Duration::days(value)),
        _ => None,
    }
}

/// "in 3 hours" reads the same as "3 hours"
fn strip_in(candidate: &str) -> &str {
    let candidate = candidate.trim();
    match candidate.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("in ") => candidate[3..].trim_start(),
        _ => candidate,
    }
}

/// `3 hours`, `10 min`, `2 days`, `1 week`
fn parse_spelled(candidate: &str) -> Option<Duration> {
    let candidate = candidate.to_lowercase();
    let caps = spelled_offset().captures(&candidate)?;
    let value: i64 = caps[1].parse().ok()?;

    match caps[2].chars().next()? {
        'm' => Some(Duration::minutes(value)),
        'h' => Some(Duration::hours(value)),
        'd' => Some(Duration::days(value)),
        'w' => Some(Duration::weeks(value)),
        _ => None,
    }
}

/// `1h30m`, `2d12h`, `45s`, `1w`
fn parse_compound(token: &str) -> Option<Duration> {
    let token = token.trim().to_lowercase();
    if !compound_duration().is_match(&token) {
        return None;
    }

    let mut total = Duration::zero();
    for caps in compound_part().captures_iter(&token) {
        let value: i64 = caps[1].parse().ok()?;
        let part = match &caps[2] {
            "s" => Duration::seconds(value),
            "m" => Duration::minutes(value),
            "h" => Duration::hours(value),
            "d" => Duration::days(value),
            "w" => Duration::weeks(value),
            _ => return None,
        };
        total = total.checked_add(&part)?;
    }
    Some(total)
}
