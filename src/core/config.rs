//! Environment-driven configuration
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Add REMINDER_UTC_OFFSET for natural-language times
//! - 1.0.0: Initial creation

use anyhow::{anyhow, Context, Result};
use chrono::FixedOffset;
use std::env;
use std::time::Duration;

const DEFAULT_DATABASE_PATH: &str = "reminders.db";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
const DEFAULT_UTC_OFFSET: &str = "+03:00";

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub discord_guild_id: Option<String>,
    pub database_path: String,
    pub poll_interval: Duration,
    pub utc_offset: FixedOffset,
    pub log_level: String,
}

impl Config {
    /// Build the configuration from the process environment.
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self> {
        let discord_token =
            env::var("DISCORD_TOKEN").context("DISCORD_TOKEN must be set to run the bot")?;

        let discord_guild_id = env::var("DISCORD_GUILD_ID")
            .ok()
            .filter(|id| !id.trim().is_empty());

        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string());

        let poll_interval = match env::var("POLL_INTERVAL_SECS") {
            Ok(raw) => parse_poll_interval(&raw)?,
            Err(_) => Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        };

        let raw_offset =
            env::var("REMINDER_UTC_OFFSET").unwrap_or_else(|_| DEFAULT_UTC_OFFSET.to_string());
        let utc_offset = parse_utc_offset(&raw_offset)
            .with_context(|| format!("Invalid REMINDER_UTC_OFFSET `{raw_offset}`"))?;

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Config {
            discord_token,
            discord_guild_id,
            database_path,
            poll_interval,
            utc_offset,
            log_level,
        })
    }
}

fn parse_poll_interval(raw: &str) -> Result<Duration> {
    let secs: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("POLL_INTERVAL_SECS must be a whole number, got `{raw}`"))?;
    if secs == 0 {
        return Err(anyhow!("POLL_INTERVAL_SECS must be at least 1"));
    }
    Ok(Duration::from_secs(secs))
}

/// Parse offsets written as `+03:00`, `+0300`, `+3`, `-05:30` or `Z`.
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(|| anyhow!("offset out of range"));
    }

    let (sign, rest) = match raw.chars().next() {
        Some('+') => (1, &raw[1..]),
        Some('-') => (-1, &raw[1..]),
        _ => (1, raw),
    };

    let (hours, minutes) = if let Some((h, m)) = rest.split_once(':') {
        (h, m)
    } else if let (4, Some(h), Some(m)) = (rest.len(), rest.get(..2), rest.get(2..)) {
        (h, m)
    } else {
        (rest, "0")
    };

    let hours: i32 = hours.parse().context("offset hours are not a number")?;
    let minutes: i32 = minutes.parse().context("offset minutes are not a number")?;
    if hours > 14 || minutes > 59 {
        return Err(anyhow!("offset {raw} is out of range"));
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or_else(|| anyhow!("offset {raw} is out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_utc_offset_formats() {
        assert_eq!(parse_utc_offset("+03:00").unwrap().local_minus_utc(), 3 * 3600);
        assert_eq!(parse_utc_offset("+0300").unwrap().local_minus_utc(), 3 * 3600);
        assert_eq!(parse_utc_offset("3").unwrap().local_minus_utc(), 3 * 3600);
        assert_eq!(
            parse_utc_offset("-05:30").unwrap().local_minus_utc(),
            -(5 * 3600 + 30 * 60)
        );
        assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);
    }

    #[test]
    fn test_parse_utc_offset_rejects_garbage() {
        assert!(parse_utc_offset("moscow").is_err());
        assert!(parse_utc_offset("+25:00").is_err());
        assert!(parse_utc_offset("+03:75").is_err());
        // four bytes with a character straddling the hour/minute split
        assert!(parse_utc_offset("+1é1").is_err());
    }

    #[test]
    fn test_parse_poll_interval() {
        assert_eq!(parse_poll_interval("60").unwrap(), Duration::from_secs(60));
        assert_eq!(parse_poll_interval(" 1 ").unwrap(), Duration::from_secs(1));
        assert!(parse_poll_interval("0").is_err());
        assert!(parse_poll_interval("ten").is_err());
    }
}
