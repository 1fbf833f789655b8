//! Harmonbot - a Discord and Twitch chat bot with a sandboxed calculator

pub mod application;
pub mod domain;
pub mod infrastructure;
