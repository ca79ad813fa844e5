//! Bot commands recognised on the leading token of a message

use teloxide::utils::command::BotCommands;

/// Prefix every command starts with
pub const COMMAND_PREFIX: char = '/';

#[derive(BotCommands, Clone, Copy, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Commands:")]
pub enum Command {
    #[command(description = "announce a shipped update")]
    RingTheBell,
    #[command(description = "abandon the announcement in progress")]
    Cancel,
    #[command(description = "show this message")]
    Help,
}

impl Command {
    /// Parse a command from the first whitespace-delimited token of `text`.
    ///
    /// A `@mention` suffix must name `bot_name`; commands addressed to another
    /// bot are not ours. Anything after the first token is ignored since no
    /// command takes arguments.
    pub fn from_text(text: &str, bot_name: &str) -> Option<Self> {
        let token = text.split_whitespace().next()?;
        Command::parse(token, bot_name).ok()
    }
}

/// Whether `text` looks like a command, recognised or not
pub fn is_command_like(text: &str) -> bool {
    text.trim_start().starts_with(COMMAND_PREFIX)
}
