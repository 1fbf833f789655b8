//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Services: Business logic orchestration
//! - Commands: Built-in chat command handlers
//! - Errors: Domain-specific errors
//! - Messaging: Message parsing and dispatching

pub mod commands;
pub mod errors;
pub mod messaging;
pub mod services;
