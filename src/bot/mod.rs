//! Bot module for handling Telegram interactions
//!
//! - `commands`: the command set and leading-token parsing
//! - `input`: transport-neutral inbound events
//! - `dialogue_manager`: the form state machine
//! - `ui_builder`: inline keyboards and menus
//! - `delivery`: executes effects against the Bot API
//! - `message_handler` / `callback_handler`: dispatcher endpoints

pub mod callback_handler;
pub mod commands;
pub mod delivery;
pub mod dialogue_manager;
pub mod input;
pub mod message_handler;
pub mod ui_builder;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;

pub use callback_handler::callback_handler;
pub use commands::Command;
pub use delivery::{deliver, Transport};
pub use dialogue_manager::{Destination, Effect, FormController, Outbound};
pub use input::{Inbound, Input, PressRejected};
pub use message_handler::message_handler;

/// Handler tree: one branch per update kind, no overlapping listeners
pub fn schema() -> UpdateHandler<anyhow::Error> {
    dptree::entry()
        .branch(Update::filter_message().endpoint(message_handler))
        .branch(Update::filter_callback_query().endpoint(callback_handler))
}
