//! Reminder command handlers
//!
//! Handles: add, list, del, remove, repeat
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 2.0.0: Position-based delete/repeat, paginated list with buttons
//! - 1.0.0: Initial add/list handlers

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;

use super::reply;
use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::slash::{get_integer_option, get_string_option};
use crate::core::embeds::{empty_list_embed, reminder_page_embed};
use crate::core::format_time_until;
use crate::features::reminders::{Recurrence, Reminder, ReminderError};
use crate::message_components::MessageComponentHandler;

const TIME_HINT: &str =
    "Put the time at the end, e.g. `standup 10m`, `deploy 2h`, `pay rent tomorrow 9:00`.";

/// Handler for reminder commands
pub struct RemindHandler;

#[async_trait]
impl SlashCommandHandler for RemindHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["add", "list", "del", "remove", "repeat"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        match command.data.name.as_str() {
            "add" => self.handle_add(&ctx, serenity_ctx, command).await,
            "list" => self.handle_list(&ctx, serenity_ctx, command).await,
            "del" | "remove" => self.handle_delete(&ctx, serenity_ctx, command).await,
            "repeat" => self.handle_repeat(&ctx, serenity_ctx, command).await,
            _ => Ok(()),
        }
    }
}

impl RemindHandler {
    /// Handle /add - parse the trailing time and store a reminder
    async fn handle_add(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let user_id = command.user.id.to_string();
        let channel_id = command.channel_id.to_string();

        let text = get_string_option(&command.data.options, "reminder")
            .ok_or_else(|| anyhow!("Missing reminder parameter"))?;

        let recurrence = match get_string_option(&command.data.options, "repeat") {
            Some(value) => match value.parse::<Recurrence>() {
                Ok(recurrence) => recurrence,
                Err(e) => return reply_with_error(serenity_ctx, command, e).await,
            },
            None => Recurrence::None,
        };

        let now = Utc::now();
        let reminder = match ctx
            .service
            .add(&user_id, &channel_id, &text, recurrence, now)
            .await
        {
            Ok(reminder) => reminder,
            Err(e) => return reply_with_error(serenity_ctx, command, e).await,
        };

        reply(
            serenity_ctx,
            command,
            &Self::confirmation(&reminder, format_time_until(reminder.due_at, now)),
            false,
        )
        .await
    }

    /// Handle /list - first page of the user's reminders with navigation buttons
    async fn handle_list(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let user_id = command.user.id.to_string();
        let reminders = ctx.service.list(&user_id).await.map_err(storage_error)?;

        if reminders.is_empty() {
            command
                .create_interaction_response(&serenity_ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|message| {
                            message.add_embed(empty_list_embed()).ephemeral(true)
                        })
                })
                .await?;
            return Ok(());
        }

        let view = ctx.list_views.open(&user_id, reminders.len());
        debug!(
            "Opened list view {} for user {user_id} ({} reminders)",
            view.id, view.total
        );

        command
            .create_interaction_response(&serenity_ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| {
                        message
                            .add_embed(reminder_page_embed(&view, &reminders, Utc::now()))
                            .set_components(MessageComponentHandler::create_list_components(
                                &view, &reminders,
                            ))
                            .ephemeral(true)
                    })
            })
            .await?;

        // Strip the buttons once the view times out
        let http = serenity_ctx.http.clone();
        let command = command.clone();
        let list_views = ctx.list_views.clone();
        let view_id = view.id;
        tokio::spawn(async move {
            tokio::time::sleep(list_views.timeout()).await;
            list_views.close(&view_id);
            if let Err(e) = command
                .edit_original_interaction_response(&http, |response| {
                    response.components(|components| components)
                })
                .await
            {
                debug!("Could not strip buttons from expired list view {view_id}: {e}");
            }
        });

        Ok(())
    }

    /// Handle /del and /remove - delete by position in /list
    async fn handle_delete(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let user_id = command.user.id.to_string();
        let position = get_integer_option(&command.data.options, "position")
            .ok_or_else(|| anyhow!("Missing position parameter"))?;

        match ctx.service.delete_at(&user_id, position).await {
            Ok(reminder) => {
                reply(
                    serenity_ctx,
                    command,
                    &format!("🗑 Deleted reminder #{position}: {}", reminder.message),
                    true,
                )
                .await
            }
            Err(e) => reply_with_error(serenity_ctx, command, e).await,
        }
    }

    /// Handle /repeat - change the recurrence of a reminder by position
    async fn handle_repeat(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let user_id = command.user.id.to_string();
        let position = get_integer_option(&command.data.options, "position")
            .ok_or_else(|| anyhow!("Missing position parameter"))?;
        let interval = get_string_option(&command.data.options, "interval")
            .ok_or_else(|| anyhow!("Missing interval parameter"))?;

        match ctx.service.set_repeat(&user_id, position, &interval).await {
            Ok(reminder) => {
                let content = if reminder.recurrence.is_recurring() {
                    format!(
                        "🔄 Reminder #{position} ({}) now repeats {}.",
                        reminder.message, reminder.recurrence
                    )
                } else {
                    format!(
                        "⏹️ Reminder #{position} ({}) will no longer repeat.",
                        reminder.message
                    )
                };
                reply(serenity_ctx, command, &content, true).await
            }
            Err(e) => reply_with_error(serenity_ctx, command, e).await,
        }
    }

    fn confirmation(reminder: &Reminder, time_until: String) -> String {
        let mut content = format!(
            "⏰ Got it! I'll remind you **{time_until}** (<t:{}:f>) about:\n> {}",
            reminder.due_at.timestamp(),
            reminder.message
        );
        if reminder.recurrence.is_recurring() {
            content.push_str(&format!("\n🔄 Repeats {}", reminder.recurrence));
        }
        content.push_str(&format!("\n\n*Reminder ID: #{}*", reminder.id));
        content
    }
}

/// Answer user mistakes ephemerally, propagate storage failures
async fn reply_with_error(
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
    error: ReminderError,
) -> Result<()> {
    let content = match error {
        ReminderError::Storage(e) => return Err(e),
        ReminderError::UnresolvedTime(_) => format!("❌ Sorry, {error}. {TIME_HINT}"),
        ReminderError::PositionOutOfRange { .. } => {
            format!("❌ Sorry, {error}. Use `/list` to see positions.")
        }
        ReminderError::InvalidRecurrence(_) => format!("❌ Sorry, {error}."),
    };

    info!(
        "Rejected /{} from user {}: {error}",
        command.data.name, command.user.id
    );
    reply(serenity_ctx, command, &content, true).await
}

fn storage_error(error: ReminderError) -> anyhow::Error {
    match error {
        ReminderError::Storage(e) => e,
        other => anyhow!(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_remind_handler_commands() {
        let handler = RemindHandler;
        let names = handler.command_names();

        for name in ["add", "list", "del", "remove", "repeat"] {
            assert!(names.contains(&name));
        }
        assert_eq!(names.len(), 5);
    }

    #[test]
    fn test_confirmation_message() {
        let reminder = Reminder {
            id: 12,
            user_id: "1".to_string(),
            channel_id: "2".to_string(),
            message: "standup".to_string(),
            due_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 10, 0).unwrap(),
            recurrence: Recurrence::Daily,
        };
        let content = RemindHandler::confirmation(&reminder, "in 10 minutes".to_string());

        assert!(content.starts_with("⏰ Got it! I'll remind you **in 10 minutes**"));
        assert!(content.contains("> standup"));
        assert!(content.contains("🔄 Repeats daily"));
        assert!(content.ends_with("*Reminder ID: #12*"));
    }

    #[test]
    fn test_storage_error_unwraps_anyhow() {
        let err = storage_error(ReminderError::Storage(anyhow!("disk I/O error")));
        assert_eq!(err.to_string(), "disk I/O error");
    }
}
