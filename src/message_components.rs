//! Button handling for `/list` views
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 2.0.0: Stateful list pagination with per-row delete buttons
//! - 1.0.0: Persona, confirmation and pagination buttons

use anyhow::Result;
use chrono::Utc;
use log::{debug, info};
use serenity::builder::CreateComponents;
use serenity::model::application::component::ButtonStyle;
use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;
use uuid::Uuid;

use crate::commands::context::CommandContext;
use crate::core::embeds::{empty_list_embed, reminder_page_embed};
use crate::features::reminders::{parse_button_id, ListAction, ListView, Reminder, ReminderError};

/// Handler for all message component interactions
pub struct MessageComponentHandler {
    context: Arc<CommandContext>,
}

impl MessageComponentHandler {
    pub fn new(context: Arc<CommandContext>) -> Self {
        Self { context }
    }

    /// Handle all types of component interactions
    pub async fn handle_component_interaction(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
    ) -> Result<()> {
        let custom_id = &interaction.data.custom_id;
        let user_id = interaction.user.id.to_string();

        info!("Processing component interaction: {custom_id} from user: {user_id}");

        match parse_button_id(custom_id) {
            Some((view_id, action)) => {
                self.handle_list_button(ctx, interaction, view_id, action).await?;
            }
            None => {
                interaction
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::ChannelMessageWithSource)
                            .interaction_response_data(|message| {
                                message
                                    .content("Unknown component interaction.")
                                    .ephemeral(true)
                            })
                    })
                    .await?;
            }
        }

        Ok(())
    }

    /// Delete buttons for the reminders on the current page, then a
    /// prev/page/next row when there is more than one page
    pub fn create_list_components(view: &ListView, reminders: &[Reminder]) -> CreateComponents {
        let mut components = CreateComponents::default();

        let range = view.page_range();
        let end = range.end.min(reminders.len());
        let start = range.start.min(end);
        let page = &reminders[start..end];

        if !page.is_empty() {
            components.create_action_row(|row| {
                for (offset, reminder) in page.iter().enumerate() {
                    row.create_button(|button| {
                        button
                            .custom_id(view.button_id(&ListAction::Delete(reminder.id)))
                            .label(format!("❌ Delete {}", start + offset + 1))
                            .style(ButtonStyle::Danger)
                    });
                }
                row
            });
        }

        if view.total_pages() > 1 {
            components.create_action_row(|row| {
                row.create_button(|button| {
                    button
                        .custom_id(view.button_id(&ListAction::Prev))
                        .label("⬅️")
                        .style(ButtonStyle::Secondary)
                        .disabled(!view.has_prev())
                })
                .create_button(|button| {
                    button
                        .custom_id(format!("rmlist:{}:info", view.id))
                        .label(format!("{}/{}", view.page + 1, view.total_pages()))
                        .style(ButtonStyle::Secondary)
                        .disabled(true)
                })
                .create_button(|button| {
                    button
                        .custom_id(view.button_id(&ListAction::Next))
                        .label("➡️")
                        .style(ButtonStyle::Secondary)
                        .disabled(!view.has_next())
                })
            });
        }

        components
    }

    /// Handle prev/next/delete clicks on a `/list` message
    async fn handle_list_button(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
        view_id: Uuid,
        action: ListAction,
    ) -> Result<()> {
        let list_views = &self.context.list_views;
        let user_id = interaction.user.id.to_string();

        let Some(mut view) = list_views.get(&view_id) else {
            debug!("List view {view_id} is gone, clearing its buttons");
            interaction
                .create_interaction_response(&ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::UpdateMessage)
                        .interaction_response_data(|message| {
                            message
                                .content("⌛ This list has expired, run `/list` again.")
                                .components(|c| c) // Clear components
                        })
                })
                .await?;
            return Ok(());
        };

        if view.owner_id != user_id {
            interaction
                .create_interaction_response(&ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|message| {
                            message
                                .content("❌ These buttons belong to someone else's `/list`.")
                                .ephemeral(true)
                        })
                })
                .await?;
            return Ok(());
        }

        match action {
            ListAction::Prev => view.prev(),
            ListAction::Next => view.next(),
            ListAction::Delete(reminder_id) => {
                let deleted = self
                    .context
                    .service
                    .delete_by_id(&user_id, reminder_id)
                    .await
                    .map_err(into_anyhow)?;
                if deleted {
                    info!("User {user_id} deleted reminder {reminder_id} from list view {view_id}");
                } else {
                    debug!("Reminder {reminder_id} was already gone");
                }
            }
        }

        let reminders = self
            .context
            .service
            .list(&user_id)
            .await
            .map_err(into_anyhow)?;

        if reminders.is_empty() {
            list_views.close(&view_id);
            interaction
                .create_interaction_response(&ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::UpdateMessage)
                        .interaction_response_data(|message| {
                            message
                                .set_embed(empty_list_embed())
                                .components(|c| c) // Clear components
                        })
                })
                .await?;
            return Ok(());
        }

        view.set_total(reminders.len());
        list_views.update(&view);

        interaction
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::UpdateMessage)
                    .interaction_response_data(|message| {
                        message
                            .set_embed(reminder_page_embed(&view, &reminders, Utc::now()))
                            .set_components(Self::create_list_components(&view, &reminders))
                    })
            })
            .await?;

        Ok(())
    }
}

fn into_anyhow(error: ReminderError) -> anyhow::Error {
    match error {
        ReminderError::Storage(e) => e,
        other => anyhow::anyhow!(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reminders::Recurrence;
    use chrono::Duration;

    fn reminders(count: usize) -> Vec<Reminder> {
        let now = Utc::now();
        (0..count)
            .map(|i| Reminder {
                id: i as i64 + 1,
                user_id: "U1".to_string(),
                channel_id: "C1".to_string(),
                message: format!("reminder {i}"),
                due_at: now + Duration::hours(i as i64 + 1),
                recurrence: Recurrence::None,
            })
            .collect()
    }

    fn row_buttons(components: &CreateComponents, row: usize) -> usize {
        components.0[row]["components"].as_array().unwrap().len()
    }

    #[test]
    fn test_single_page_has_no_navigation_row() {
        let reminders = reminders(3);
        let view = ListView::new("U1", reminders.len());
        let components = MessageComponentHandler::create_list_components(&view, &reminders);

        assert_eq!(components.0.len(), 1);
        assert_eq!(row_buttons(&components, 0), 3);
    }

    #[test]
    fn test_last_page_shows_remaining_rows_and_navigation() {
        let reminders = reminders(7);
        let mut view = ListView::new("U1", reminders.len());
        view.next();
        let components = MessageComponentHandler::create_list_components(&view, &reminders);

        assert_eq!(components.0.len(), 2);
        assert_eq!(row_buttons(&components, 0), 2);
        assert_eq!(row_buttons(&components, 1), 3);

        let first_delete = &components.0[0]["components"][0];
        assert_eq!(first_delete["label"], "❌ Delete 6");
        assert_eq!(
            first_delete["custom_id"],
            view.button_id(&ListAction::Delete(6)).as_str()
        );
    }

    #[test]
    fn test_navigation_buttons_disabled_at_edges() {
        let reminders = reminders(7);
        let view = ListView::new("U1", reminders.len());
        let components = MessageComponentHandler::create_list_components(&view, &reminders);

        let nav = &components.0[1]["components"];
        assert_eq!(nav[0]["disabled"], true);
        assert_eq!(nav[1]["label"], "1/2");
        assert_eq!(nav[2]["disabled"], false);
    }

    #[test]
    fn test_info_button_does_not_parse_as_action() {
        let view = ListView::new("U1", 7);
        assert!(parse_button_id(&format!("rmlist:{}:info", view.id)).is_none());
    }
}
