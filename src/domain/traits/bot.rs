use async_trait::async_trait;
use crate::domain::entities::{Message, Platform};
use crate::application::errors::BotError;

/// Bot trait - abstraction for messaging platform adapters
///
/// Connection handling and message framing live behind this trait; the
/// rest of the bot only sees parsed messages and plain-text replies.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Start the bot and begin listening for messages
    async fn start(&self) -> Result<(), BotError>;

    /// Wait for the next incoming message, `None` once the source is closed
    async fn next_message(&self) -> Result<Option<Message>, BotError>;

    /// Send a message to a chat
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<String, BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
    pub username: String,
    pub platform: Platform,
}
