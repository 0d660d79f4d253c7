use anyhow::{Context, Result, anyhow};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Durable string storage the session keeps its history in.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// In-process store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(|_| anyhow!("memory store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| anyhow!("memory store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Default)]
struct FileContents(HashMap<String, String>);

/// Keeps every key in a single JSON object on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<FileContents> {
        if !self.path.exists() {
            return Ok(FileContents::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read store file {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse store file {}", self.path.display()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read()?.0.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        // a corrupt file is overwritten
        let mut contents = self.read().unwrap_or_default();
        contents.0.insert(key.to_string(), value.to_string());
        let content = serde_json::to_string_pretty(&contents).context("Failed to serialize store")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write store file {}", self.path.display()))?;
        debug!("Wrote key '{}' to {}", key, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("color-changer-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn memory_store_shares_entries_between_clones() {
        let store = MemoryStore::new();
        let handle = store.clone();
        assert_eq!(store.get("colorHistory").unwrap(), None);
        store.set("colorHistory", "[]").unwrap();
        assert_eq!(handle.get("colorHistory").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn file_store_persists_across_instances() {
        let path = temp_path("persist");
        let _ = std::fs::remove_file(&path);

        let store = FileStore::new(path.clone());
        assert_eq!(store.get("colorHistory").unwrap(), None);
        store.set("colorHistory", r##"["#AABBCC"]"##).unwrap();
        store.set("other", "x").unwrap();

        let reopened = FileStore::new(path.clone());
        assert_eq!(reopened.get("colorHistory").unwrap().as_deref(), Some(r##"["#AABBCC"]"##));
        assert_eq!(reopened.get("other").unwrap().as_deref(), Some("x"));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn file_store_reports_corrupt_file_then_recovers_on_write() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileStore::new(path.clone());
        assert!(store.get("colorHistory").is_err());
        store.set("colorHistory", "[]").unwrap();
        assert_eq!(store.get("colorHistory").unwrap().as_deref(), Some("[]"));

        std::fs::remove_file(&path).unwrap();
    }
}
