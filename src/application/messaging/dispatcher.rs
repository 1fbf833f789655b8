//! Message dispatcher - Routes messages to handlers
//!
//! Lookup order for a command name:
//!
//! 1. built-in commands (names and aliases, case-insensitive)
//! 2. the channel's aliases, which rename step 3 entries
//! 3. the channel's custom commands
//! 4. the channel's counter commands
//!
//! Anything else gets no reply.

use std::sync::Arc;

use super::parser::MessageParser;
use crate::application::services::CommandService;
use crate::domain::entities::{Content, Message, Reply};
use crate::domain::traits::Store;
use crate::infrastructure::config::CounterConfig;

/// Message dispatcher - routes messages to built-in and channel commands
pub struct MessageDispatcher {
    parser: MessageParser,
    commands: CommandService,
    store: Arc<dyn Store>,
    counters: Vec<CounterConfig>,
}

impl MessageDispatcher {
    pub fn new(parser: MessageParser, commands: CommandService, store: Arc<dyn Store>) -> Self {
        Self {
            parser,
            commands,
            store,
            counters: Vec::new(),
        }
    }

    pub fn with_counters(mut self, counters: Vec<CounterConfig>) -> Self {
        self.counters = counters;
        self
    }

    /// Process a raw text message
    pub async fn process_text(&self, chat_id: &str, text: &str) -> Option<Reply> {
        let message = self.parser.parse(chat_id, text, None);
        self.dispatch(message).await
    }

    /// Route a message and produce the reply, if any
    pub async fn dispatch(&self, message: Message) -> Option<Reply> {
        // Adapters hand over raw text; commands are recognised here
        let message = match message.content.text().map(str::to_string) {
            Some(text) => self.parser.parse(message.chat_id.clone(), text, message.sender.clone()),
            None => message,
        };

        let Content::Command { name, .. } = &message.content else {
            return None;
        };
        let name = name.clone();

        match self.commands.handle(&message).await {
            Ok(Some(reply)) => return Some(reply),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Command {} failed: {}", name, e);
                return Some(Reply::error(e.to_string()));
            }
        }

        let channel = message.channel();
        match self.channel_command(channel, &name).await {
            Ok(Some(reply)) => Some(reply),
            Ok(None) => {
                tracing::debug!("Ignoring unknown command {} in {}", name, channel);
                None
            }
            Err(e) => {
                tracing::error!("Channel command {} in {} failed: {}", name, channel, e);
                None
            }
        }
    }

    async fn channel_command(
        &self,
        channel: &str,
        name: &str,
    ) -> Result<Option<Reply>, crate::application::errors::StorageError> {
        let target = self
            .store
            .resolve_alias(channel, name)
            .await?
            .unwrap_or_else(|| name.to_string());

        if let Some(text) = self.store.lookup_command(channel, &target).await? {
            return Ok(Some(Reply::Text(text)));
        }

        let counter = self
            .counters
            .iter()
            .find(|c| c.channel.eq_ignore_ascii_case(channel) && c.command.eq_ignore_ascii_case(&target));
        if let Some(counter) = counter {
            let count = self.store.increment(channel, &counter.variable).await?;
            return Ok(Some(Reply::Text(counter.template.replace("{count}", &count.to_string()))));
        }

        Ok(None)
    }
}
