//! Built-in command groups
//!
//! Math commands are available everywhere. Finance, astronomy and
//! Overwatch lookups belong to the Discord bot; the chat utilities
//! belong to the Twitch bot.

pub mod astronomy;
pub mod finance;
pub mod format;
pub mod math;
pub mod overwatch;
pub mod twitch;

use std::sync::Arc;

use crate::application::errors::CommandError;
use crate::application::services::{CalculatorService, CommandService};
use crate::domain::entities::{Message, Platform};
use crate::infrastructure::apis::{AstronomyApi, FinanceApi, OverwatchApi};

/// Everything command handlers need to reach
#[derive(Clone)]
pub struct CommandContext {
    pub calculator: Arc<CalculatorService>,
    pub finance: Arc<FinanceApi>,
    pub astronomy: Arc<AstronomyApi>,
    pub overwatch: Arc<OverwatchApi>,
    /// Lowercase nickname the bot answers to
    pub bot_name: String,
}

/// Register the command set for `platform`
pub fn register_all(commands: &mut CommandService, ctx: &CommandContext, platform: Platform) {
    commands.register_defaults();
    math::register(commands, ctx.calculator.clone());

    match platform {
        Platform::Discord => {
            finance::register(commands, ctx.finance.clone());
            astronomy::register(commands, ctx.astronomy.clone());
            overwatch::register(commands, ctx.overwatch.clone());
        }
        Platform::Twitch => twitch::register(commands, &ctx.bot_name),
    }

    tracing::info!("Registered {} commands for {}", commands.len(), platform);
}

/// The `index`th argument, or an error naming what is missing
pub(crate) fn required_arg<'a>(msg: &'a Message, index: usize, what: &str) -> Result<&'a str, CommandError> {
    msg.content
        .args()
        .get(index)
        .map(String::as_str)
        .ok_or_else(|| CommandError::InvalidArgs(format!("missing {}", what)))
}
