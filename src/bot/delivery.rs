//! Delivery of controller effects through the Telegram Bot API

use anyhow::Result;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, LinkPreviewOptions, MessageId, ParseMode, ReplyParameters};
use tracing::{debug, error};

use super::dialogue_manager::{Destination, Effect, FormController, Outbound};
use super::input::Inbound;
use super::ui_builder::build_keyboard;
use crate::config::BotConfig;
use crate::session_store::SessionStore;

/// The requests delivery needs from the chat platform
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `outbound` as Telegram HTML to `chat_id`
    async fn send_outbound(
        &self,
        chat_id: ChatId,
        outbound: &Outbound,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<()>;

    /// Remove the inline keyboard from a message
    async fn clear_keyboard(&self, chat_id: ChatId, message_id: MessageId) -> Result<()>;
}

#[async_trait]
impl Transport for Bot {
    async fn send_outbound(
        &self,
        chat_id: ChatId,
        outbound: &Outbound,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<()> {
        let mut request = self
            .send_message(chat_id, outbound.text.clone())
            .parse_mode(ParseMode::Html);

        if let Some(markup) = keyboard {
            request = request.reply_markup(markup);
        }

        if let Some(message_id) = outbound.reply_to {
            request = request.reply_parameters(ReplyParameters::new(message_id));
        }

        if outbound.destination == Destination::Broadcast {
            request = request.link_preview_options(LinkPreviewOptions {
                is_disabled: true,
                url: None,
                prefer_small_media: false,
                prefer_large_media: false,
                show_above_text: false,
            });
        }

        request.await?;
        Ok(())
    }

    async fn clear_keyboard(&self, chat_id: ChatId, message_id: MessageId) -> Result<()> {
        self.edit_message_reply_markup(chat_id, message_id).await?;
        Ok(())
    }
}

/// Carry out `effects` in order for `inbound`.
///
/// Failed requests are logged and never retried. The outcome of an
/// [`Effect::Publish`] is reported back to the controller, and a failed
/// broadcast stops delivery of the remaining effects.
pub async fn deliver<T, S>(
    transport: &T,
    config: &BotConfig,
    controller: &FormController<S>,
    inbound: &Inbound,
    effects: Vec<Effect>,
) where
    T: Transport,
    S: SessionStore,
{
    let origin = inbound.key.chat_id;

    for effect in effects {
        match effect {
            Effect::Send(outbound) => {
                send(transport, config, controller, inbound, &outbound).await;
            }
            Effect::Publish(outbound) => {
                if send(transport, config, controller, inbound, &outbound).await {
                    if let Some(notice) = controller.complete_publish(inbound) {
                        send(transport, config, controller, inbound, &notice).await;
                    }
                } else {
                    let notice = controller.publish_failed(inbound);
                    send(transport, config, controller, inbound, &notice).await;
                    return;
                }
            }
            Effect::ClearKeyboard { message_id } => {
                match transport.clear_keyboard(origin, message_id).await {
                    Ok(()) => debug!(chat_id = %origin, "Removed inline keyboard"),
                    Err(e) => {
                        error!(chat_id = %origin, error = %e, "Failed to remove inline keyboard")
                    }
                }
            }
        }
    }
}

/// Send one message, returning whether it went through
async fn send<T, S>(
    transport: &T,
    config: &BotConfig,
    controller: &FormController<S>,
    inbound: &Inbound,
    outbound: &Outbound,
) -> bool
where
    T: Transport,
    S: SessionStore,
{
    let origin = inbound.key.chat_id;
    let chat_id = match outbound.destination {
        Destination::Origin => origin,
        Destination::Broadcast => config.broadcast_target(origin),
    };

    // Buttons only answer for the participant the message was sent to
    let keyboard = outbound
        .keyboard
        .map(|layout| build_keyboard(layout, inbound.key.user_id, controller.messages()));

    match transport.send_outbound(chat_id, outbound, keyboard).await {
        Ok(()) => true,
        Err(e) => {
            error!(
                chat_id = %chat_id,
                destination = ?outbound.destination,
                error = %e,
                "Failed to send message"
            );
            false
        }
    }
}
