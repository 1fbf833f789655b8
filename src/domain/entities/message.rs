use super::{Platform, User};
use chrono::{DateTime, Utc};

/// Message content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    /// A prefixed command. `rest` is the argument text exactly as typed
    /// after the command name, for commands that take freeform input.
    Command { name: String, args: Vec<String>, rest: String },
    Empty,
}

impl Content {
    pub fn text(&self) -> Option<&str> {
        match self {
            Content::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_command(&self) -> bool {
        matches!(self, Content::Command { .. })
    }

    pub fn args(&self) -> &[String] {
        match self {
            Content::Command { args, .. } => args,
            _ => &[],
        }
    }

    pub fn rest(&self) -> &str {
        match self {
            Content::Command { rest, .. } => rest,
            _ => "",
        }
    }
}

/// Represents an incoming message
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub chat_id: String,
    pub sender: Option<User>,
    pub content: Content,
    pub timestamp: DateTime<Utc>,
    pub platform: Platform,
}

impl Message {
    pub fn new(chat_id: impl Into<String>, content: Content) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            chat_id: chat_id.into(),
            sender: None,
            content,
            timestamp: Utc::now(),
            platform: Platform::default(),
        }
    }

    pub fn from_text(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(chat_id, Content::Text(text.into()))
    }

    pub fn from_command(chat_id: impl Into<String>, name: impl Into<String>, args: Vec<String>) -> Self {
        let rest = args.join(" ");
        Self::new(chat_id, Content::Command { name: name.into(), args, rest })
    }

    pub fn with_sender(mut self, user: User) -> Self {
        self.sender = Some(user);
        self
    }

    pub fn with_sender_opt(mut self, user: Option<User>) -> Self {
        if let Some(u) = user {
            self.sender = Some(u);
        }
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Channel name without the IRC `#` sigil.
    pub fn channel(&self) -> &str {
        self.chat_id.trim_start_matches('#')
    }

    /// Name used when a reply addresses the sender.
    pub fn sender_name(&self) -> String {
        self.sender
            .as_ref()
            .map(|u| u.capitalized())
            .unwrap_or_else(|| "Someone".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_accessors() {
        let msg = Message::from_command("#mikki", "hello", vec!["the".into(), "chat".into()]);
        assert!(msg.content.is_command());
        assert_eq!(msg.content.args().len(), 2);
        assert_eq!(msg.content.rest(), "the chat");
        assert_eq!(msg.channel(), "mikki");
        assert_eq!(msg.sender_name(), "Someone");
    }

    #[test]
    fn test_text_has_no_args() {
        let msg = Message::from_text("general", "just chatting");
        assert_eq!(msg.content.text(), Some("just chatting"));
        assert!(msg.content.args().is_empty());
    }
}
