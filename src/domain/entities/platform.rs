use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chat platform the bot is serving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Discord,
    Twitch,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Discord => "discord",
            Platform::Twitch => "twitch",
        }
    }

    /// Longest reply the platform will display.
    ///
    /// Discord replies are embed descriptions; Twitch replies are IRC
    /// PRIVMSG bodies.
    pub fn message_limit(&self) -> usize {
        match self {
            Platform::Discord => 2048,
            Platform::Twitch => 500,
        }
    }

    /// Render a reply the way the platform shows it to users
    pub fn render(&self, reply: &Reply) -> String {
        match (self, reply) {
            (_, Reply::Text(text)) => text.clone(),
            (Platform::Discord, Reply::Error(text)) => format!(":no_entry: {}", text),
            (Platform::Twitch, Reply::Error(text)) => format!("\u{26D4} {}", text),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "discord" => Ok(Platform::Discord),
            "twitch" => Ok(Platform::Twitch),
            other => Err(format!("unknown platform: {}", other)),
        }
    }
}

/// Outgoing reply, before platform decoration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Error(String),
}

impl Reply {
    pub fn text(s: impl Into<String>) -> Self {
        Reply::Text(s.into())
    }

    pub fn error(s: impl Into<String>) -> Self {
        Reply::Error(s.into())
    }

    pub fn body(&self) -> &str {
        match self {
            Reply::Text(s) | Reply::Error(s) => s,
        }
    }
}

impl From<String> for Reply {
    fn from(s: String) -> Self {
        Reply::Text(s)
    }
}

impl From<&str> for Reply {
    fn from(s: &str) -> Self {
        Reply::Text(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_errors_per_platform() {
        let reply = Reply::error("Syntax error");
        assert_eq!(Platform::Discord.render(&reply), ":no_entry: Syntax error");
        assert_eq!(Platform::Twitch.render(&reply), "\u{26D4} Syntax error");
        assert_eq!(Platform::Twitch.render(&Reply::text("4")), "4");
    }

    #[test]
    fn test_parse_platform() {
        assert_eq!("Twitch".parse::<Platform>(), Ok(Platform::Twitch));
        assert!("irc".parse::<Platform>().is_err());
        assert!(Platform::Twitch.message_limit() < Platform::Discord.message_limit());
    }
}
