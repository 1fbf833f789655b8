//! Twitch chat utility commands

pub mod conversions;
pub mod countdown;
pub mod greetings;
pub mod links;
pub mod runescape;

use crate::application::services::CommandService;

pub fn register(commands: &mut CommandService, bot_name: &str) {
    greetings::register(commands, bot_name);
    links::register(commands);
    countdown::register(commands);
    runescape::register(commands);
    conversions::register(commands);
}
