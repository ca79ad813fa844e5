//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::debug;

use super::delivery::deliver;
use super::dialogue_manager::FormController;
use super::input::{sender_display_name, Inbound, Input, PressRejected};
use crate::config::BotConfig;
use crate::dialogue::ConversationKey;

/// Handle callback queries from inline keyboards
pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    controller: Arc<FormController>,
    config: Arc<BotConfig>,
) -> Result<()> {
    debug!(user_id = %q.from.id, "Received callback query from user");

    let mut notice = None;
    match (q.data.as_deref(), &q.message) {
        (Some(data), Some(msg)) => match Input::from_callback(data, q.from.id, msg.id()) {
            Ok(input) => {
                let inbound = Inbound {
                    key: ConversationKey::new(msg.chat().id, q.from.id),
                    sender_name: sender_display_name(
                        q.from.username.as_deref(),
                        &q.from.full_name(),
                    ),
                    reply_to: None,
                    received_at: Utc::now(),
                    input,
                };

                let effects = controller.handle(&inbound);
                deliver(&bot, &config, &*controller, &inbound, effects).await;
            }
            Err(PressRejected::NotOwner) => {
                debug!(user_id = %q.from.id, data, "Ignoring press on another user's keyboard");
                notice = Some(controller.messages().get("button-not-yours"));
            }
            Err(PressRejected::Unrecognised) => {
                debug!(user_id = %q.from.id, data, "Ignoring unrecognised callback data");
            }
        },
        _ => {
            debug!(user_id = %q.from.id, data = ?q.data, "Ignoring callback without usable data");
        }
    }

    // Answer the callback query to remove the loading state
    let mut answer = bot.answer_callback_query(q.id);
    if let Some(text) = notice {
        answer = answer.text(text);
    }
    answer.await?;

    Ok(())
}
