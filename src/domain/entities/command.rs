use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::{Message, Reply};
use crate::application::errors::CommandError;

/// Future returned by a command handler
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Reply, CommandError>> + Send>>;

/// Command handler function type
pub type CommandHandler = Arc<dyn Fn(Message) -> HandlerFuture + Send + Sync>;

/// Represents a bot command
#[derive(Clone)]
pub struct Command {
    pub name: String,
    pub description: Option<String>,
    pub aliases: Vec<String>,
    pub usage: Option<String>,
    pub handler: Option<CommandHandler>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            aliases: Vec::new(),
            usage: None,
            handler: None,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    pub fn with_handler<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(Message) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Reply, CommandError>> + Send + 'static,
    {
        self.handler = Some(Arc::new(move |msg| Box::pin(handler(msg))));
        self
    }

    pub fn matches(&self, input: &str) -> bool {
        let input_lower = input.to_lowercase();
        self.name.to_lowercase() == input_lower ||
            self.aliases.iter().any(|a| a.to_lowercase() == input_lower)
    }
}

/// Command registry for managing available commands
#[derive(Default, Clone)]
pub struct CommandRegistry {
    commands: HashMap<String, Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: Command) {
        if let Some(previous) = self.commands.insert(command.name.clone(), command) {
            tracing::warn!("Command {} registered twice, keeping the last one", previous.name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    pub fn find(&self, input: &str) -> Option<&Command> {
        self.commands
            .get(&input.to_lowercase())
            .or_else(|| self.commands.values().find(|c| c.matches(input)))
    }

    pub fn all(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_alias_ignores_case() {
        let mut registry = CommandRegistry::new();
        registry.register(Command::new("calculate").with_aliases(&["calc", "calculator"]));
        registry.register(Command::new("sqrt"));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.find("CALC").map(|c| c.name.as_str()), Some("calculate"));
        assert_eq!(registry.find("sqrt").map(|c| c.name.as_str()), Some("sqrt"));
        assert!(registry.find("integrate").is_none());
    }

    #[tokio::test]
    async fn test_handler_is_invoked() {
        let cmd = Command::new("ping").with_handler(|_msg| async { Ok(Reply::text("pong")) });
        let handler = cmd.handler.clone().expect("handler set");
        let reply = handler(Message::from_command("c", "ping", vec![])).await.unwrap();
        assert_eq!(reply, Reply::text("pong"));
    }
}
