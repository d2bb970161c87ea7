use anyhow::Result;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, Recipient};
use tracing::{info, instrument};

use crate::error::SendMessageError;

/// Outbound chat transport. Returns the id of the delivered message.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn deliver(&self, chat_id: &str, text: &str) -> Result<i32>;
}

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(token: &str) -> Self {
        Self {
            bot: Bot::new(token),
        }
    }
}

/// Numeric ids address chats directly; anything else is a channel username.
pub fn recipient(chat_id: &str) -> Recipient {
    match chat_id.trim().parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) => Recipient::ChannelUsername(chat_id.trim().to_string()),
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn deliver(&self, chat_id: &str, text: &str) -> Result<i32> {
        let sent = self.bot.send_message(recipient(chat_id), text).await?;
        Ok(sent.id.0)
    }
}

/// Send `text` once; no retries and no deduplication.
#[instrument(skip_all, fields(chat_id = %chat_id))]
pub async fn send_message(
    messenger: &dyn Messenger,
    chat_id: &str,
    text: &str,
) -> Result<(), SendMessageError> {
    match messenger.deliver(chat_id, text).await {
        Ok(message_id) => {
            info!(message_id, "message sent");
            Ok(())
        }
        Err(source) => Err(SendMessageError {
            chat_id: chat_id.to_string(),
            source,
        }),
    }
}
