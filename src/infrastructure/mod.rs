//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Storage: Per-channel commands, aliases and variables
//! - Http/Apis: Web services behind the Discord lookups
//! - Sandbox: Out-of-process calculator workers
//! - Adapters: Platform integrations

pub mod adapters;
pub mod apis;
pub mod config;
pub mod http;
pub mod sandbox;
pub mod storage;
