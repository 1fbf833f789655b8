use crate::application::errors::CommandError;
use crate::domain::entities::{Command, CommandRegistry, Content, Message, Reply};

/// Service for managing and executing built-in commands
pub struct CommandService {
    registry: CommandRegistry,
    prefix: String,
}

impl CommandService {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            registry: CommandRegistry::new(),
            prefix: prefix.into(),
        }
    }

    pub fn register(&mut self, command: Command) {
        self.registry.register(command);
    }

    pub fn register_defaults(&mut self) {
        self.register(Command::new("help").with_description("Show help message").with_usage("help [command]"));

        self.register(
            Command::new("version")
                .with_description("Show bot version")
                .with_handler(|_| async { Ok(Reply::text(format!("Harmonbot v{}", env!("CARGO_PKG_VERSION")))) }),
        );
    }

    /// Run the built-in command named in `message`.
    ///
    /// `Ok(None)` means no built-in command with a handler has that name.
    pub async fn handle(&self, message: &Message) -> Result<Option<Reply>, CommandError> {
        let Content::Command { name, args, .. } = &message.content else {
            return Ok(None);
        };

        let Some(cmd) = self.registry.find(name) else {
            return Ok(None);
        };

        if cmd.name == "help" {
            return Ok(Some(Reply::text(self.get_help(args.first().map(String::as_str)))));
        }

        match &cmd.handler {
            Some(handler) => handler(message.clone()).await.map(Some),
            None => {
                tracing::warn!("Command {} has no handler", cmd.name);
                Ok(None)
            }
        }
    }

    pub fn get_help(&self, command: Option<&str>) -> String {
        if let Some(name) = command {
            if let Some(cmd) = self.registry.find(name) {
                let mut help = format!("{}{} - {}", self.prefix, cmd.name, cmd.description.as_deref().unwrap_or("No description"));
                if !cmd.aliases.is_empty() {
                    help.push_str(&format!("\nAliases: {}", cmd.aliases.join(", ")));
                }
                if let Some(usage) = &cmd.usage {
                    help.push_str(&format!("\nUsage: {}{}", self.prefix, usage));
                }
                return help;
            }
            return format!("Command {}{} not found", self.prefix, name);
        }

        let mut names: Vec<&str> = self.registry.all().map(|c| c.name.as_str()).collect();
        names.sort_unstable();
        format!(
            "Available commands: {}",
            names.iter().map(|n| format!("{}{}", self.prefix, n)).collect::<Vec<_>>().join(" ")
        )
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}
