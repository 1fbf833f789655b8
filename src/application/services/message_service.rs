use std::sync::Arc;

use crate::application::errors::BotError;
use crate::application::messaging::MessageDispatcher;
use crate::domain::entities::{Message, Reply};
use crate::domain::traits::Bot;

/// Pulls messages off a bot adapter and answers them.
///
/// Each message is handled on its own task, so a slow command (an API
/// call, a calculation near its time limit) never holds up the others.
pub struct MessageService<B: Bot> {
    bot: Arc<B>,
    dispatcher: Arc<MessageDispatcher>,
}

impl<B: Bot + 'static> MessageService<B> {
    pub fn new(bot: B, dispatcher: MessageDispatcher) -> Self {
        Self {
            bot: Arc::new(bot),
            dispatcher: Arc::new(dispatcher),
        }
    }

    pub fn bot(&self) -> &B {
        &self.bot
    }

    /// Run until the adapter has no more messages
    pub async fn run(&self) -> Result<(), BotError> {
        self.bot.start().await?;
        let info = self.bot.bot_info();
        tracing::info!("Bot started: {} on {}", info.name, info.platform);

        let mut tasks = tokio::task::JoinSet::new();
        while let Some(message) = self.bot.next_message().await? {
            let bot = self.bot.clone();
            let dispatcher = self.dispatcher.clone();
            tasks.spawn(async move {
                let chat_id = message.chat_id.clone();
                let platform = message.platform;
                if let Some(reply) = dispatcher.dispatch(message).await {
                    if let Err(e) = bot.send_message(&chat_id, &platform.render(&reply)).await {
                        tracing::error!("Failed to send reply to {}: {}", chat_id, e);
                    }
                }
            });

            // Reap finished handlers as we go
            while tasks.try_join_next().is_some() {}
        }

        while tasks.join_next().await.is_some() {}
        tracing::info!("Message source closed, shutting down");
        Ok(())
    }

    /// Process one message and return the rendered reply, if any
    pub async fn process(&self, message: Message) -> Option<String> {
        let platform = message.platform;
        let reply: Reply = self.dispatcher.dispatch(message).await?;
        Some(platform.render(&reply))
    }
}
