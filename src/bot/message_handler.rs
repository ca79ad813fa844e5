//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::Me;
use tracing::debug;

use super::delivery::deliver;
use super::dialogue_manager::FormController;
use super::input::{sender_display_name, Inbound, Input};
use crate::config::BotConfig;
use crate::dialogue::ConversationKey;

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    me: Me,
    controller: Arc<FormController>,
    config: Arc<BotConfig>,
) -> Result<()> {
    let Some(text) = msg.text() else {
        debug!(chat_id = %msg.chat.id, "Ignoring non-text message");
        return Ok(());
    };

    // Channel posts and some service messages have no sender
    let Some(user) = msg.from.as_ref() else {
        debug!(chat_id = %msg.chat.id, "Ignoring message without sender");
        return Ok(());
    };

    debug!(
        chat_id = %msg.chat.id,
        user_id = %user.id,
        message_length = text.len(),
        "Received text message"
    );

    let inbound = Inbound {
        key: ConversationKey::new(msg.chat.id, user.id),
        sender_name: sender_display_name(user.username.as_deref(), &user.full_name()),
        reply_to: Some(msg.id),
        received_at: msg.date,
        input: Input::from_text(text, me.username()),
    };

    let effects = controller.handle(&inbound);
    deliver(&bot, &config, &*controller, &inbound, effects).await;

    Ok(())
}
