//! Domain layer - Core business logic with no external dependencies
//! 
//! This layer contains:
//! - Entities: Core business objects (User, Message, Command, Platform)
//! - Traits: Abstractions for infrastructure (Bot, Store)
//! - Calculator: The restricted expression language and its outcomes

pub mod calculator;
pub mod entities;
pub mod traits;
