//! Reminder embed builders for Discord responses
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 2.0.0: Paginated list embed driven by `ListView`
//! - 1.0.0: Delivery and help embeds

use chrono::{DateTime, Utc};
use serenity::builder::CreateEmbed;
use serenity::utils::Color;

use crate::core::{format_time_until, truncate_for_embed, truncate_for_field_name};
use crate::features::reminders::{ListView, Reminder};

/// The embed posted when a reminder fires
pub fn reminder_delivery_embed(reminder: &Reminder) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed.title("⏰ Reminder!");
    embed.description(truncate_for_embed(&reminder.message));
    embed.color(Color::GOLD);
    if reminder.recurrence.is_recurring() {
        embed.footer(|f| f.text(format!("🔄 Repeats {}", reminder.recurrence)));
    }
    embed
}

/// Name and value of the embed field for the reminder at 1-based `position`
pub fn list_field(position: usize, reminder: &Reminder) -> (String, String) {
    let name = truncate_for_field_name(&format!("{position}. {}", reminder.message));
    let timestamp = reminder.due_at.timestamp();
    let mut value = format!("<t:{timestamp}:f> (<t:{timestamp}:R>)");
    if reminder.recurrence.is_recurring() {
        value.push_str(&format!(" 🔄 {}", reminder.recurrence));
    }
    (name, value)
}

/// One page of a user's reminders. `reminders` is the full list, in list order.
pub fn reminder_page_embed(view: &ListView, reminders: &[Reminder], now: DateTime<Utc>) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed.title(format!(
        "📋 Your reminders (page {}/{})",
        view.page + 1,
        view.total_pages()
    ));
    embed.color(Color::BLUE);

    if let Some(next) = reminders.first() {
        embed.description(format!(
            "Next up {}",
            format_time_until(next.due_at, now)
        ));
    }

    let range = view.page_range();
    let end = range.end.min(reminders.len());
    let start = range.start.min(end);
    for (offset, reminder) in reminders[start..end].iter().enumerate() {
        let (name, value) = list_field(start + offset + 1, reminder);
        embed.field(name, value, false);
    }

    embed.footer(|f| {
        f.text(format!(
            "{} pending · positions work with /del and /repeat",
            view.total
        ))
    });
    embed
}

/// Shown by `/list` when the user has nothing scheduled
pub fn empty_list_embed() -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed.title("📭 No reminders");
    embed.description(
        "You don't have any pending reminders.\n\nUse `/add <text> <time>` to create one!",
    );
    embed.color(Color::ORANGE);
    embed
}

pub fn help_embed() -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed.title("📖 Reminder bot help");
    embed.color(Color::BLUE);
    embed.field(
        "/add <text> <time> [repeat]",
        "Schedule a reminder. The time goes at the end:\n\
         `standup 10m` · `deploy 2h` · `renew passport 3d` · `stretch 1h30m`\n\
         `pay rent tomorrow 9:00` · `call mum friday 18:30` · `tea in 20 minutes`",
        false,
    );
    embed.field("/list", "Show your reminders, 5 per page, soonest first", false);
    embed.field(
        "/del <position> · /remove <position>",
        "Delete the reminder at that position in /list",
        false,
    );
    embed.field(
        "/repeat <position> <daily|hourly|none>",
        "Make a reminder repeat, or stop it repeating",
        false,
    );
    embed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reminders::Recurrence;
    use chrono::TimeZone;

    fn reminder(message: &str, recurrence: Recurrence) -> Reminder {
        Reminder {
            id: 7,
            user_id: "1".to_string(),
            channel_id: "2".to_string(),
            message: message.to_string(),
            due_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            recurrence,
        }
    }

    #[test]
    fn test_list_field_one_shot() {
        let (name, value) = list_field(3, &reminder("standup", Recurrence::None));
        assert_eq!(name, "3. standup");
        assert_eq!(value, "<t:1714564800:f> (<t:1714564800:R>)");
    }

    #[test]
    fn test_list_field_marks_recurrence() {
        let (_, value) = list_field(1, &reminder("pills", Recurrence::Daily));
        assert!(value.ends_with("🔄 daily"));
    }

    #[test]
    fn test_list_field_truncates_long_messages() {
        let (name, _) = list_field(1, &reminder(&"x".repeat(600), Recurrence::None));
        assert!(name.len() <= crate::core::FIELD_NAME_LIMIT);
    }

    #[test]
    fn test_embeds_build() {
        let reminders: Vec<Reminder> = (0..7).map(|_| reminder("r", Recurrence::None)).collect();
        let mut view = ListView::new("1", reminders.len());
        view.next();
        let now = Utc::now();
        let _page = reminder_page_embed(&view, &reminders, now);
        let _delivery = reminder_delivery_embed(&reminders[0]);
        let _empty = empty_list_embed();
        let _help = help_embed();
    }
}
