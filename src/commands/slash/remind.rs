//! Reminder slash commands: /add, /list, /del, /remove, /repeat

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

/// Creates reminder commands
pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![
        create_add_command(),
        create_list_command(),
        create_delete_command("del"),
        create_delete_command("remove"),
        create_repeat_command(),
    ]
}

fn create_add_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("add")
        .description("Schedule a reminder")
        .create_option(|option| {
            option
                .name("reminder")
                .description("What to remind you about, then when: `standup 10m`, `pay rent tomorrow 9:00`")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .create_option(|option| {
            option
                .name("repeat")
                .description("Repeat the reminder after it fires")
                .kind(CommandOptionType::String)
                .required(false)
                .add_string_choice("hourly", "hourly")
                .add_string_choice("daily", "daily")
        })
        .to_owned()
}

fn create_list_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("list")
        .description("Show your pending reminders")
        .to_owned()
}

fn create_delete_command(name: &str) -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name(name)
        .description("Delete a reminder by its position in /list")
        .create_option(|option| {
            option
                .name("position")
                .description("Position shown in /list")
                .kind(CommandOptionType::Integer)
                .required(true)
        })
        .to_owned()
}

fn create_repeat_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("repeat")
        .description("Make a reminder repeat, or stop it repeating")
        .create_option(|option| {
            option
                .name("position")
                .description("Position shown in /list")
                .kind(CommandOptionType::Integer)
                .required(true)
        })
        .create_option(|option| {
            option
                .name("interval")
                .description("How often it should repeat")
                .kind(CommandOptionType::String)
                .required(true)
                .add_string_choice("daily", "daily")
                .add_string_choice("hourly", "hourly")
                .add_string_choice("none", "none")
        })
        .to_owned()
}
