//! Utility command handlers
//!
//! Handles: help, ping
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 2.0.0: Help is a reminder usage embed, ping reports uptime
//! - 1.0.0: Extracted from command_handler.rs

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;

use super::reply;
use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::core::embeds::help_embed;
use crate::core::format_duration;

/// Handler for utility commands: help, ping
pub struct UtilityHandler;

#[async_trait]
impl SlashCommandHandler for UtilityHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["help", "ping"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        match command.data.name.as_str() {
            "help" => self.handle_help(serenity_ctx, command).await,
            "ping" => self.handle_ping(&ctx, serenity_ctx, command).await,
            _ => Ok(()),
        }
    }
}

impl UtilityHandler {
    /// Handle /help command
    async fn handle_help(
        &self,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        command
            .create_interaction_response(&serenity_ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| {
                        message.add_embed(help_embed()).ephemeral(true)
                    })
            })
            .await?;

        Ok(())
    }

    /// Handle /ping command
    async fn handle_ping(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let uptime = ctx.start_time.elapsed().as_secs() as i64;
        reply(serenity_ctx, command, &Self::pong(uptime), true).await?;

        info!("Ping command completed for user {}", command.user.id);
        Ok(())
    }

    fn pong(uptime_secs: i64) -> String {
        format!("🏓 Pong! ⏱️ Up for {}", format_duration(uptime_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utility_handler_commands() {
        let handler = UtilityHandler;
        let names = handler.command_names();

        assert!(names.contains(&"help"));
        assert!(names.contains(&"ping"));
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_pong_includes_uptime() {
        assert_eq!(UtilityHandler::pong(3660), "🏓 Pong! ⏱️ Up for 1 hour 1 minute");
    }
}
