//! Transport-neutral inbound events.
//!
//! Telegram messages and callback queries are both reduced to an [`Inbound`]
//! before they reach the form controller.

use chrono::{DateTime, Utc};
use teloxide::types::{MessageId, UserId};

use super::commands::Command;
use super::ui_builder::parse_callback_data;
use crate::dialogue::ConversationKey;

/// One inbound event from a single participant
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inbound {
    pub key: ConversationKey,
    /// Display name of the sender, used as the submitter on start
    pub sender_name: String,
    /// Message replies should be threaded under, if any
    pub reply_to: Option<MessageId>,
    pub received_at: DateTime<Utc>,
    pub input: Input,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    /// Raw typed text, possibly an unrecognised command
    Text(String),
    /// Inline button press carrying a bare selection token
    Selection {
        token: String,
        keyboard_message: Option<MessageId>,
    },
}

impl Input {
    /// Classify typed text as a command for `bot_name` or a plain answer
    pub fn from_text(text: &str, bot_name: &str) -> Self {
        match Command::from_text(text, bot_name) {
            Some(command) => Input::Command(command),
            None => Input::Text(text.to_string()),
        }
    }

    /// Turn a button press by `presser` into a selection.
    ///
    /// Presses on a keyboard sent to somebody else are rejected so they can
    /// neither advance the presser's form nor touch the owner's message.
    pub fn from_callback(
        data: &str,
        presser: UserId,
        keyboard_message: MessageId,
    ) -> Result<Self, PressRejected> {
        let press = parse_callback_data(data).ok_or(PressRejected::Unrecognised)?;
        if press.owner != presser {
            return Err(PressRejected::NotOwner);
        }

        Ok(Input::Selection {
            token: press.token.to_string(),
            keyboard_message: Some(keyboard_message),
        })
    }
}

/// Why a button press produced no input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressRejected {
    /// Data this bot never generates
    Unrecognised,
    /// The keyboard belongs to another participant
    NotOwner,
}

/// Answer to the "send this announcement?" question
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Publish,
    Discard,
}

impl Decision {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "y" | "yes" => Some(Decision::Publish),
            "n" | "no" => Some(Decision::Discard),
            _ => None,
        }
    }
}

/// Name shown in the announcement attribution line
pub fn sender_display_name(username: Option<&str>, full_name: &str) -> String {
    match username {
        Some(username) if !username.is_empty() => format!("@{username}"),
        _ => full_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_classification() {
        assert_eq!(Input::from_text("/cancel", "Bot"), Input::Command(Command::Cancel));
        assert_eq!(
            Input::from_text("Dark Mode", "Bot"),
            Input::Text("Dark Mode".to_string())
        );
        assert_eq!(
            Input::from_text("/unknown", "Bot"),
            Input::Text("/unknown".to_string())
        );
        assert_eq!(
            Input::from_text("/cancel@OtherBot", "Bot"),
            Input::Text("/cancel@OtherBot".to_string())
        );
    }

    #[test]
    fn test_callback_press_by_owner() {
        assert_eq!(
            Input::from_callback("type:7:2", UserId(7), MessageId(5)),
            Ok(Input::Selection {
                token: "2".to_string(),
                keyboard_message: Some(MessageId(5)),
            })
        );
    }

    #[test]
    fn test_callback_press_rejections() {
        assert_eq!(
            Input::from_callback("confirm:7:yes", UserId(8), MessageId(5)),
            Err(PressRejected::NotOwner)
        );
        assert_eq!(
            Input::from_callback("type:2", UserId(7), MessageId(5)),
            Err(PressRejected::Unrecognised)
        );
    }

    #[test]
    fn test_decision_parsing() {
        for yes in ["Y", "y", "yes", "YES", " Yes "] {
            assert_eq!(Decision::parse(yes), Some(Decision::Publish), "{yes:?}");
        }
        for no in ["N", "n", "no", "No", "NO\n"] {
            assert_eq!(Decision::parse(no), Some(Decision::Discard), "{no:?}");
        }
        for other in ["", "yep", "nope", "1", "ok", "y es"] {
            assert_eq!(Decision::parse(other), None, "{other:?}");
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(sender_display_name(Some("alice"), "Alice Smith"), "@alice");
        assert_eq!(sender_display_name(None, "Alice Smith"), "Alice Smith");
        assert_eq!(sender_display_name(Some(""), "Alice"), "Alice");
    }
}
