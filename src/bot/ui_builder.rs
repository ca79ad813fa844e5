//! UI Builder module for creating keyboards and formatting menus

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, UserId};

use crate::messages::Messages;
use crate::update_type::UpdateType;

const TYPE_PREFIX: &str = "type:";
const CONFIRM_PREFIX: &str = "confirm:";

/// A button press decoded from callback data
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallbackData<'a> {
    /// Participant the keyboard was sent to
    pub owner: UserId,
    pub token: &'a str,
}

/// Interactive button layouts the form can attach to a prompt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keyboard {
    UpdateTypes,
    Confirmation,
}

/// Numbered list of update types for the type prompt
pub fn format_update_type_menu() -> String {
    UpdateType::ALL
        .iter()
        .map(|kind| format!("{}. {} {}", kind.token(), kind.emoji(), kind.label()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the inline keyboard for a layout owned by `owner`
pub fn build_keyboard(keyboard: Keyboard, owner: UserId, messages: &Messages) -> InlineKeyboardMarkup {
    match keyboard {
        Keyboard::UpdateTypes => create_update_type_keyboard(owner),
        Keyboard::Confirmation => create_confirmation_keyboard(owner, messages),
    }
}

fn callback(prefix: &str, owner: UserId, token: &str) -> String {
    format!("{prefix}{}:{token}", owner.0)
}

/// Two-by-two grid of update type buttons
pub fn create_update_type_keyboard(owner: UserId) -> InlineKeyboardMarkup {
    let buttons: Vec<Vec<InlineKeyboardButton>> = UpdateType::ALL
        .chunks(2)
        .map(|row| {
            row.iter()
                .map(|kind| {
                    InlineKeyboardButton::callback(
                        format!("{} {}", kind.emoji(), kind.label()),
                        callback(TYPE_PREFIX, owner, kind.token()),
                    )
                })
                .collect()
        })
        .collect();

    InlineKeyboardMarkup::new(buttons)
}

/// Send / Cancel buttons under the preview
pub fn create_confirmation_keyboard(owner: UserId, messages: &Messages) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback(
            messages.get("button-send"),
            callback(CONFIRM_PREFIX, owner, "yes"),
        ),
        InlineKeyboardButton::callback(
            messages.get("button-cancel"),
            callback(CONFIRM_PREFIX, owner, "no"),
        ),
    ]])
}

/// Decode callback data produced by this module.
///
/// The format is `<prefix><owner user id>:<token>`. Returns `None` for data
/// this bot never generates.
pub fn parse_callback_data(data: &str) -> Option<CallbackData<'_>> {
    let rest = data
        .strip_prefix(TYPE_PREFIX)
        .or_else(|| data.strip_prefix(CONFIRM_PREFIX))?;
    let (owner, token) = rest.split_once(':')?;
    let owner = owner.parse::<u64>().ok()?;

    if token.is_empty() {
        return None;
    }

    Some(CallbackData {
        owner: UserId(owner),
        token,
    })
}
