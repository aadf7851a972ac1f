//! Slash command entry point
//!
//! Tags each interaction with a request id, dispatches it through the
//! `CommandRegistry` and answers commands nobody handles.
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 2.0.0: Registry-only dispatch over reminder handlers
//! - 1.0.0: Initial monolithic handler

use anyhow::Result;
use log::{debug, info, warn};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;
use uuid::Uuid;

use crate::commands::context::CommandContext;
use crate::commands::handlers::create_all_handlers;
use crate::commands::registry::CommandRegistry;

#[derive(Clone)]
pub struct CommandHandler {
    registry: Arc<CommandRegistry>,
    context: Arc<CommandContext>,
}

impl CommandHandler {
    pub fn new(context: CommandContext) -> Self {
        CommandHandler {
            registry: Arc::new(CommandRegistry::with_handlers(create_all_handlers())),
            context: Arc::new(context),
        }
    }

    /// Shared state, also handed to the component handler
    pub fn context(&self) -> Arc<CommandContext> {
        Arc::clone(&self.context)
    }

    pub async fn handle_slash_command(
        &self,
        ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let request_id = Uuid::new_v4();
        let guild_id = command
            .guild_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "DM".to_string());

        info!(
            "[{}] 📥 Slash command received | Command: {} | User: {} | Channel: {} | Guild: {}",
            request_id, command.data.name, command.user.id, command.channel_id, guild_id
        );

        let handled = self
            .registry
            .dispatch(Arc::clone(&self.context), ctx, command)
            .await?;

        if !handled {
            warn!("[{}] ❓ Unknown slash command: {}", request_id, command.data.name);
            debug!("[{request_id}] 📤 Sending unknown command response to Discord");
            command
                .create_interaction_response(&ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|message| {
                            message
                                .content("Unknown command. Use `/help` to see available commands.")
                                .ephemeral(true)
                        })
                })
                .await?;
        }

        info!("[{request_id}] ✅ Slash command processing completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::features::reminders::{ListViewStore, ReminderService, TimeResolver};
    use chrono::FixedOffset;

    #[tokio::test]
    async fn test_command_handler_shares_context() {
        let database = Database::new(":memory:").await.unwrap();
        let offset = FixedOffset::east_opt(3 * 3600).unwrap();
        let service = ReminderService::new(database, TimeResolver::new(offset));
        let handler = CommandHandler::new(CommandContext::new(service, ListViewStore::default()));

        assert!(Arc::ptr_eq(&handler.context(), &handler.clone().context()));
        for name in ["add", "list", "del", "remove", "repeat", "help", "ping"] {
            assert!(handler.registry.contains(name), "/{name} is not registered");
        }
    }
}
