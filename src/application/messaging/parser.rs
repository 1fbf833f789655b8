//! Message parser - Parses raw messages into structured messages

use crate::domain::entities::{Content, Message, Platform, User};

/// Parses incoming messages into structured Message objects
#[derive(Debug, Clone)]
pub struct MessageParser {
    command_prefix: String,
    platform: Platform,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>, platform: Platform) -> Self {
        Self {
            command_prefix: prefix.into(),
            platform,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.command_prefix
    }

    /// Parse a text message
    pub fn parse(&self, chat_id: impl Into<String>, text: impl Into<String>, sender: Option<User>) -> Message {
        let text = text.into();
        let content = self.parse_content(&text);

        Message::new(chat_id, content)
            .with_sender_opt(sender)
            .with_platform(self.platform)
    }

    /// `<prefix><name> <args...>`, keeping the argument text as typed
    fn parse_content(&self, text: &str) -> Content {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Content::Empty;
        }

        let Some(cmd_text) = trimmed.strip_prefix(self.command_prefix.as_str()) else {
            return Content::Text(trimmed.to_string());
        };

        let (name, rest) = match cmd_text.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim_start()),
            None => (cmd_text, ""),
        };
        if name.is_empty() {
            return Content::Text(trimmed.to_string());
        }

        Content::Command {
            name: name.to_string(),
            args: rest.split_whitespace().map(str::to_string).collect(),
            rest: rest.to_string(),
        }
    }
}
