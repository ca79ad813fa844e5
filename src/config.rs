//! Configuration loaded from the process environment.

use secrecy::SecretString;
use teloxide::types::ChatId;

use crate::error::ConfigError;

pub const TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const GROUP_CHAT_VAR: &str = "GROUP_CHAT_ID";

/// Bot configuration.
#[derive(Debug)]
pub struct BotConfig {
    /// Telegram bot token, passed straight to the transport.
    pub bot_token: SecretString,
    /// Chat receiving published announcements. When unset, announcements are
    /// posted back into the chat the form was filled in.
    pub broadcast_chat: Option<ChatId>,
}

impl BotConfig {
    /// Read configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            std::env::var(TOKEN_VAR).ok(),
            std::env::var(GROUP_CHAT_VAR).ok(),
        )
    }

    /// Build configuration from raw variable values
    pub fn from_values(
        token: Option<String>,
        group_chat: Option<String>,
    ) -> Result<Self, ConfigError> {
        let bot_token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(TOKEN_VAR.to_string()))?;

        let broadcast_chat = match group_chat.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                let id = raw.parse::<i64>().map_err(|e| ConfigError::InvalidValue {
                    key: GROUP_CHAT_VAR.to_string(),
                    message: format!("'{raw}' is not a chat id: {e}"),
                })?;
                Some(ChatId(id))
            }
        };

        Ok(Self {
            bot_token: SecretString::from(bot_token),
            broadcast_chat,
        })
    }

    /// Where announcements go for a form filled in `origin`
    pub fn broadcast_target(&self, origin: ChatId) -> ChatId {
        self.broadcast_chat.unwrap_or(origin)
    }
}
