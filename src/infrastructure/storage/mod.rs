//! File-based storage implementation
//!
//! Layout under the data directory:
//!
//! ```text
//! commands/<channel>.json          name -> reply text
//! commands/aliases/<channel>.json  name -> command name
//! variables/<channel>.json         key -> JSON value
//! ```

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::application::errors::StorageError;
use crate::domain::traits::Store;

type Table = Map<String, Value>;

/// JSON file-based store
///
/// Tables are read lazily and cached; variable writes go to disk straight
/// away.
pub struct JsonStore {
    base_path: PathBuf,
    tables: Arc<RwLock<HashMap<PathBuf, Table>>>,
}

impl JsonStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            tables: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn init(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(self.base_path.join("commands").join("aliases")).await?;
        tokio::fs::create_dir_all(self.base_path.join("variables")).await?;
        Ok(())
    }

    fn commands_path(&self, channel: &str) -> PathBuf {
        self.base_path.join("commands").join(file_name(channel))
    }

    fn aliases_path(&self, channel: &str) -> PathBuf {
        self.base_path.join("commands").join("aliases").join(file_name(channel))
    }

    fn variables_path(&self, channel: &str) -> PathBuf {
        self.base_path.join("variables").join(file_name(channel))
    }

    async fn lookup(&self, path: PathBuf, key: &str) -> Result<Option<Value>, StorageError> {
        if let Some(table) = self.tables.read().await.get(&path) {
            return Ok(table.get(key).cloned());
        }

        let table = read_table(&path).await?;
        let value = table.get(key).cloned();
        self.tables.write().await.entry(path).or_insert(table);
        Ok(value)
    }

    /// Read-modify-write of one variables table under the write lock.
    ///
    /// The cache only takes the new table once it is on disk.
    async fn update_variables<F, T>(&self, channel: &str, update: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut Table) -> T,
    {
        let path = self.variables_path(channel);
        let mut tables = self.tables.write().await;

        let mut table = match tables.get(&path) {
            Some(cached) => cached.clone(),
            None => read_table(&path).await?,
        };

        let result = update(&mut table);
        write_table(&path, &table).await?;
        tables.insert(path, table);
        Ok(result)
    }
}

#[async_trait]
impl Store for JsonStore {
    async fn lookup_command(&self, channel: &str, name: &str) -> Result<Option<String>, StorageError> {
        let value = self.lookup(self.commands_path(channel), name).await?;
        Ok(value.and_then(|v| v.as_str().map(str::to_string)))
    }

    async fn resolve_alias(&self, channel: &str, name: &str) -> Result<Option<String>, StorageError> {
        let value = self.lookup(self.aliases_path(channel), name).await?;
        Ok(value.and_then(|v| v.as_str().map(str::to_string)))
    }

    async fn get_variable(&self, channel: &str, key: &str) -> Result<Option<Value>, StorageError> {
        self.lookup(self.variables_path(channel), key).await
    }

    async fn set_variable(&self, channel: &str, key: &str, value: Value) -> Result<(), StorageError> {
        self.update_variables(channel, |table| {
            table.insert(key.to_string(), value);
        })
        .await
    }

    async fn increment(&self, channel: &str, counter: &str) -> Result<i64, StorageError> {
        let count = self
            .update_variables(channel, |table| {
                let next = table.get(counter).and_then(Value::as_i64).unwrap_or(0) + 1;
                table.insert(counter.to_string(), Value::from(next));
                next
            })
            .await?;
        tracing::debug!("{}.{} = {}", channel, counter, count);
        Ok(count)
    }
}

fn file_name(channel: &str) -> String {
    format!("{}.json", channel.trim_start_matches('#').to_lowercase())
}

/// A missing file is an empty table
async fn read_table(path: &Path) -> Result<Table, StorageError> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Table::new()),
        Err(e) => Err(e.into()),
    }
}

async fn write_table(path: &Path, table: &Table) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let content = serde_json::to_string_pretty(table)?;
    tokio::fs::write(path, content).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("harmonbot-store-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_commands_and_aliases() {
        let dir = temp_dir();
        let store = JsonStore::new(&dir);
        store.init().await.unwrap();
        std::fs::write(dir.join("commands/mikki.json"), r#"{"discord": "https://discord.gg/mikki"}"#).unwrap();
        std::fs::write(dir.join("commands/aliases/mikki.json"), r#"{"dc": "discord"}"#).unwrap();

        assert_eq!(store.resolve_alias("#mikki", "dc").await.unwrap().as_deref(), Some("discord"));
        assert_eq!(
            store.lookup_command("#mikki", "discord").await.unwrap().as_deref(),
            Some("https://discord.gg/mikki")
        );
        assert_eq!(store.lookup_command("#other", "discord").await.unwrap(), None);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_increment_persists() {
        let dir = temp_dir();
        let store = JsonStore::new(&dir);

        assert_eq!(store.increment("mikki", "ticks").await.unwrap(), 1);
        assert_eq!(store.increment("mikki", "ticks").await.unwrap(), 2);

        let reopened = JsonStore::new(&dir);
        assert_eq!(reopened.get_variable("mikki", "ticks").await.unwrap(), Some(Value::from(2)));
        assert_eq!(reopened.increment("mikki", "ticks").await.unwrap(), 3);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_failed_write_does_not_count() {
        let dir = temp_dir();
        let store = JsonStore::new(&dir);
        let path = dir.join("variables/mikki.json");

        assert_eq!(store.increment("mikki", "ticks").await.unwrap(), 1);

        // A directory in place of the file makes the write fail
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();
        assert!(store.increment("mikki", "ticks").await.is_err());
        assert_eq!(store.get_variable("mikki", "ticks").await.unwrap(), Some(Value::from(1)));

        std::fs::remove_dir(&path).unwrap();
        assert_eq!(store.increment("mikki", "ticks").await.unwrap(), 2);
        let saved: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["ticks"], 2);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_increments() {
        let dir = temp_dir();
        let store = Arc::new(JsonStore::new(&dir));

        let tasks: Vec<_> = (0..10)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.increment("mikki", "sheep").await.unwrap() })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(store.get_variable("mikki", "sheep").await.unwrap(), Some(Value::from(10)));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_set_variable() {
        let dir = temp_dir();
        let store = JsonStore::new(&dir);
        store.set_variable("mikki", "sheep.status", Value::Bool(true)).await.unwrap();
        assert_eq!(store.get_variable("mikki", "sheep.status").await.unwrap(), Some(Value::Bool(true)));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
