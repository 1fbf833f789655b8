use async_trait::async_trait;
use serde_json::Value;
use crate::application::errors::StorageError;

/// Store trait - per-channel command tables and variables
///
/// Channels own three tables: custom commands (name to canned reply),
/// aliases (name to command name) and variables (counters and flags).
#[async_trait]
pub trait Store: Send + Sync {
    // Command tables
    async fn lookup_command(&self, channel: &str, name: &str) -> Result<Option<String>, StorageError>;
    async fn resolve_alias(&self, channel: &str, name: &str) -> Result<Option<String>, StorageError>;

    // Variables
    async fn get_variable(&self, channel: &str, key: &str) -> Result<Option<Value>, StorageError>;
    async fn set_variable(&self, channel: &str, key: &str, value: Value) -> Result<(), StorageError>;

    /// Add one to a counter variable, creating it at zero, and return the new value
    async fn increment(&self, channel: &str, counter: &str) -> Result<i64, StorageError>;
}
