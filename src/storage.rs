//! Durable key-value storage and the chat history kept in it

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{ChatLog, Message};

/// Key the chat history is stored under
pub const HISTORY_KEY: &str = "chatHistory";

/// One file per key inside a data directory
#[derive(Debug, Clone)]
pub struct LocalStorage {
    dir: PathBuf,
}

impl LocalStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let value = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {:?}", path))?;
        Ok(Some(value))
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        fs::write(&path, value).with_context(|| format!("Failed to write {:?}", path))?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(&path).with_context(|| format!("Failed to remove {:?}", path))?;
        }
        Ok(())
    }
}

/// Persistence adapter writing the chat log through to storage
#[derive(Debug, Clone)]
pub struct ChatHistory {
    storage: LocalStorage,
}

impl ChatHistory {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    /// Restore the saved log. Missing or unreadable history yields an empty log.
    pub fn load(&self) -> ChatLog {
        let saved = match self.storage.get(HISTORY_KEY) {
            Ok(Some(saved)) => saved,
            Ok(None) => return ChatLog::new(),
            Err(e) => {
                tracing::warn!("could not read chat history: {:#}", e);
                return ChatLog::new();
            }
        };

        match serde_json::from_str::<Vec<Message>>(&saved) {
            Ok(records) => {
                tracing::debug!("restored {} messages from history", records.len());
                ChatLog::from_records(records)
            }
            Err(e) => {
                tracing::warn!("discarding malformed chat history: {}", e);
                ChatLog::new()
            }
        }
    }

    pub fn save(&self, log: &ChatLog) -> Result<()> {
        let serialized = serde_json::to_string(log.records())?;
        self.storage.set(HISTORY_KEY, &serialized)
    }

    pub fn clear(&self) -> Result<()> {
        self.storage.remove(HISTORY_KEY)
    }

    /// The raw stored value, if any
    pub fn stored(&self) -> Result<Option<String>> {
        self.storage.get(HISTORY_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn history() -> (TempDir, ChatHistory) {
        let dir = TempDir::new().unwrap();
        let history = ChatHistory::new(LocalStorage::new(dir.path().join("data")));
        (dir, history)
    }

    #[test]
    fn test_storage_get_missing_key() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());
        assert_eq!(storage.get("nothing").unwrap(), None);
    }

    #[test]
    fn test_storage_set_get_remove() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().join("nested"));
        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
        storage.remove("k").unwrap();
        assert_eq!(storage.get("k").unwrap(), None);
        // removing twice is fine
        storage.remove("k").unwrap();
    }

    #[test]
    fn test_load_without_history_is_empty() {
        let (_dir, history) = history();
        assert!(history.load().is_empty());
    }

    #[test]
    fn test_save_then_load_renders_identically() {
        let (_dir, history) = history();
        let mut log = ChatLog::new();
        log.push(Message::user("hello"));
        log.push(Message::assistant("hi there"));
        log.push(Message::error("⚠️ Server unreachable. Try again later."));

        history.save(&log).unwrap();
        assert_eq!(history.load(), log);
    }

    #[test]
    fn test_malformed_history_is_discarded() {
        let (_dir, history) = history();
        history
            .storage
            .set(HISTORY_KEY, "<div class=\"message\">old markup</div>")
            .unwrap();
        assert!(history.load().is_empty());
    }

    #[test]
    fn test_clear_removes_stored_value() {
        let (_dir, history) = history();
        let mut log = ChatLog::new();
        log.push(Message::user("hello"));
        history.save(&log).unwrap();
        assert!(history.stored().unwrap().is_some());

        history.clear().unwrap();
        assert_eq!(history.stored().unwrap(), None);
    }
}
