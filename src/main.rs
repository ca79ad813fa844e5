use anyhow::Result;
use secrecy::ExposeSecret;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ring_the_bell::bot::{self, Command, FormController};
use ring_the_bell::config::BotConfig;
use ring_the_bell::messages::Messages;
use ring_the_bell::session_store::InMemorySessionStore;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // LOG_FORMAT=json switches to one JSON object per line
    if std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json") {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_tracing();

    info!("Starting Ring the Bell bot");

    let config = Arc::new(BotConfig::from_env()?);
    match config.broadcast_chat {
        Some(chat_id) => info!(chat_id = %chat_id, "Announcements go to the broadcast chat"),
        None => info!("No broadcast chat configured, announcing in the originating chat"),
    }

    let messages = Messages::new()?;
    let controller = Arc::new(FormController::new(InMemorySessionStore::new(), messages));

    let bot = Bot::new(config.bot_token.expose_secret());

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %e, "Failed to register bot commands");
    }

    info!("Bot initialized, starting dispatcher");

    Dispatcher::builder(bot, bot::schema())
        .dependencies(dptree::deps![Arc::clone(&controller), config])
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error from the update handler",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!(
        pending = controller.store().len(),
        "Dispatcher stopped, discarding pending submissions"
    );
    controller.store().clear();

    Ok(())
}
