//! # Reminder Scheduler
//!
//! Polls the reminders table on a fixed interval and delivers everything that
//! is due. Recurring reminders move forward by their interval; one-shot
//! reminders are deleted. A failed delivery is logged and the reminder still
//! moves on, there are no retries.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Delivery behind `ReminderSink`, hourly/daily recurrence, shutdown signal
//! - 1.0.0: Initial polling loop

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use serenity::http::Http;
use serenity::model::id::ChannelId;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use super::model::Reminder;
use crate::core::embeds::reminder_delivery_embed;
use crate::database::Database;

/// Where due reminders are sent
#[async_trait]
pub trait ReminderSink: Send + Sync {
    async fn deliver(&self, reminder: &Reminder) -> Result<()>;
}

/// Delivers reminders to their Discord channel, mentioning the owner
pub struct DiscordSink {
    http: Arc<Http>,
}

impl DiscordSink {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ReminderSink for DiscordSink {
    async fn deliver(&self, reminder: &Reminder) -> Result<()> {
        let channel_id: u64 = reminder
            .channel_id
            .parse()
            .with_context(|| format!("Invalid channel id `{}`", reminder.channel_id))?;

        ChannelId(channel_id)
            .send_message(&self.http, |message| {
                message
                    .content(format!("<@{}>", reminder.user_id))
                    .set_embed(reminder_delivery_embed(reminder))
            })
            .await?;

        Ok(())
    }
}

/// What one poll did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub delivered: usize,
    pub failed: usize,
    pub rescheduled: usize,
    pub removed: usize,
}

impl TickSummary {
    pub fn is_empty(&self) -> bool {
        self.delivered == 0 && self.failed == 0
    }
}

pub struct ReminderScheduler {
    database: Database,
    poll_interval: Duration,
}

impl ReminderScheduler {
    pub fn new(database: Database, poll_interval: Duration) -> Self {
        Self {
            database,
            poll_interval,
        }
    }

    /// Poll until `shutdown` flips to true or its sender is dropped
    pub async fn run(&self, sink: Arc<dyn ReminderSink>, mut shutdown: watch::Receiver<bool>) {
        info!(
            "⏰ Reminder scheduler started (polling every {}s)",
            self.poll_interval.as_secs()
        );

        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match self.process_due(sink.as_ref(), Utc::now()).await {
                        Ok(summary) if !summary.is_empty() => debug!("Reminder tick: {summary:?}"),
                        Ok(_) => {}
                        Err(e) => error!("Reminder tick failed: {e:#}"),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("⏰ Reminder scheduler stopped");
    }

    /// Deliver every reminder due at `now` and apply its recurrence
    pub async fn process_due(&self, sink: &dyn ReminderSink, now: DateTime<Utc>) -> Result<TickSummary> {
        let due = self.database.get_due_reminders(now).await?;
        let mut summary = TickSummary::default();

        for reminder in due {
            match sink.deliver(&reminder).await {
                Ok(()) => {
                    info!(
                        "🔔 Delivered reminder {} to user {} in channel {}",
                        reminder.id, reminder.user_id, reminder.channel_id
                    );
                    summary.delivered += 1;
                }
                Err(e) => {
                    warn!(
                        "Failed to deliver reminder {} to channel {}: {e:#}",
                        reminder.id, reminder.channel_id
                    );
                    summary.failed += 1;
                }
            }

            match reminder.recurrence.next_due(reminder.due_at) {
                Some(next_due) => {
                    self.database.reschedule_reminder(reminder.id, next_due).await?;
                    debug!("Reminder {} repeats {}, next at {next_due}", reminder.id, reminder.recurrence);
                    summary.rescheduled += 1;
                }
                None => {
                    self.database.remove_reminder(reminder.id).await?;
                    summary.removed += 1;
                }
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reminders::Recurrence;
    use anyhow::anyhow;
    use chrono::{Duration as ChronoDuration, TimeZone};
    use std::sync::Mutex;

    /// Records deliveries; fails every delivery when `fail` is set
    #[derive(Default)]
    struct RecordingSink {
        delivered: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl ReminderSink for RecordingSink {
        async fn deliver(&self, reminder: &Reminder) -> Result<()> {
            if self.fail {
                return Err(anyhow!("Missing Access"));
            }
            self.delivered
                .lock()
                .unwrap()
                .push((reminder.channel_id.clone(), reminder.message.clone()));
            Ok(())
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    async fn setup() -> (Database, ReminderScheduler) {
        let db = Database::new(":memory:").await.unwrap();
        let scheduler = ReminderScheduler::new(db.clone(), Duration::from_secs(10));
        (db, scheduler)
    }

    #[tokio::test]
    async fn test_one_shot_reminder_is_delivered_then_removed() {
        let (db, scheduler) = setup().await;
        let sink = RecordingSink::default();
        let due = now() + ChronoDuration::minutes(10);
        let id = db.add_reminder("U1", "C1", "standup", due, Recurrence::None).await.unwrap();

        let early = scheduler.process_due(&sink, now() + ChronoDuration::minutes(5)).await.unwrap();
        assert!(early.is_empty());
        assert!(db.get_reminder(id).await.unwrap().is_some());

        let summary = scheduler.process_due(&sink, due).await.unwrap();
        assert_eq!(summary.delivered, 1);
        assert_eq!(summary.removed, 1);
        assert_eq!(
            *sink.delivered.lock().unwrap(),
            vec![("C1".to_string(), "standup".to_string())]
        );
        assert!(db.get_reminder(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_daily_reminder_moves_exactly_one_day_from_previous_due() {
        let (db, scheduler) = setup().await;
        let sink = RecordingSink::default();
        let due = now() - ChronoDuration::minutes(3);
        let id = db.add_reminder("U1", "C1", "pills", due, Recurrence::Daily).await.unwrap();

        let summary = scheduler.process_due(&sink, now()).await.unwrap();
        assert_eq!(summary.rescheduled, 1);

        let reminder = db.get_reminder(id).await.unwrap().unwrap();
        assert_eq!(reminder.due_at, due + ChronoDuration::hours(24));
    }

    #[tokio::test]
    async fn test_hourly_reminder_moves_one_hour() {
        let (db, scheduler) = setup().await;
        let sink = RecordingSink::default();
        let id = db.add_reminder("U1", "C1", "stretch", now(), Recurrence::Hourly).await.unwrap();

        scheduler.process_due(&sink, now()).await.unwrap();
        scheduler.process_due(&sink, now() + ChronoDuration::minutes(30)).await.unwrap();

        let reminder = db.get_reminder(id).await.unwrap().unwrap();
        assert_eq!(reminder.due_at, now() + ChronoDuration::hours(1));
        assert_eq!(sink.delivered.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_delivery_still_advances_lifecycle() {
        let (db, scheduler) = setup().await;
        let sink = RecordingSink {
            fail: true,
            ..Default::default()
        };
        let once = db.add_reminder("U1", "C1", "once", now(), Recurrence::None).await.unwrap();
        let daily = db.add_reminder("U1", "C1", "daily", now(), Recurrence::Daily).await.unwrap();

        let summary = scheduler.process_due(&sink, now()).await.unwrap();
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.delivered, 0);

        assert!(db.get_reminder(once).await.unwrap().is_none());
        let daily = db.get_reminder(daily).await.unwrap().unwrap();
        assert_eq!(daily.due_at, now() + ChronoDuration::hours(24));
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let (_db, scheduler) = setup().await;
        let sink: Arc<dyn ReminderSink> = Arc::new(RecordingSink::default());
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(async move { scheduler.run(sink, rx).await });
        tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("scheduler did not stop")
            .unwrap();
    }
}
