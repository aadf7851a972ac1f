//! Utility slash commands: /help, /ping

use serenity::builder::CreateApplicationCommand;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![
        CreateApplicationCommand::default()
            .name("help")
            .description("How to schedule and manage reminders")
            .to_owned(),
        CreateApplicationCommand::default()
            .name("ping")
            .description("Check that the bot is alive")
            .to_owned(),
    ]
}
