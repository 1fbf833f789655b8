//! Console adapter for development/testing

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use crate::application::errors::BotError;
use crate::domain::entities::{Message, Platform, User};
use crate::domain::traits::{Bot, BotInfo};

/// Reads chat lines from stdin and prints replies to stdout.
///
/// Every line is treated as a message in `channel`, sent by a user named
/// `console`, on whichever platform the bot is emulating.
pub struct ConsoleAdapter {
    info: BotInfo,
    channel: String,
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl ConsoleAdapter {
    pub fn new(name: impl Into<String>, platform: Platform) -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: name.into(),
                username: "console".to_string(),
                platform,
            },
            channel: "console".to_string(),
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    /// Channel incoming lines are attributed to
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode) in {}", self.channel);
        Ok(())
    }

    async fn next_message(&self) -> Result<Option<Message>, BotError> {
        let mut lines = self.lines.lock().await;
        let Some(line) = lines.next_line().await? else {
            return Ok(None);
        };

        let sender = User::new("console").with_username("console");
        Ok(Some(
            Message::from_text(self.channel.clone(), line)
                .with_sender(sender)
                .with_platform(self.info.platform),
        ))
    }

    async fn send_message(&self, _chat_id: &str, text: &str) -> Result<String, BotError> {
        println!("[BOT] {}", text);
        Ok("console_msg".to_string())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
