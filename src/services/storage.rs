//! Persistence backends for the serialized timer collection

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use anyhow::Context;
use tracing::debug;

/// Key-value style storage holding one serialized collection
pub trait Storage: Send {
    /// Return the stored collection, or `None` if nothing was saved yet
    fn load_collection(&self) -> anyhow::Result<Option<String>>;

    /// Replace the stored collection
    fn save_collection(&self, data: &str) -> anyhow::Result<()>;
}

/// Stores the collection as a JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for JsonFileStorage {
    fn load_collection(&self) -> anyhow::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No timer file at {}", self.path.display());
                Ok(None)
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", self.path.display())),
        }
    }

    fn save_collection(&self, data: &str) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        // Write next to the target and rename so a crash never leaves half a file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        debug!("Saved timer collection to {}", self.path.display());
        Ok(())
    }
}

/// In-memory storage; clones share the same slot
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-filled with raw data
    pub fn with_data(data: impl Into<String>) -> Self {
        Self { slot: Arc::new(Mutex::new(Some(data.into()))) }
    }

    /// Current raw contents
    pub fn contents(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl Storage for MemoryStorage {
    fn load_collection(&self) -> anyhow::Result<Option<String>> {
        let slot = self.slot.lock().map_err(|e| anyhow::anyhow!("Failed to lock storage: {}", e))?;
        Ok(slot.clone())
    }

    fn save_collection(&self, data: &str) -> anyhow::Result<()> {
        let mut slot = self.slot.lock().map_err(|e| anyhow::anyhow!("Failed to lock storage: {}", e))?;
        *slot = Some(data.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("timers.json"));
        assert_eq!(storage.load_collection().unwrap(), None);
    }

    #[test]
    fn file_storage_replaces_contents() {
        let dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("nested/deeper/timers.json"));

        storage.save_collection("[1]").unwrap();
        storage.save_collection("[2]").unwrap();

        assert_eq!(storage.load_collection().unwrap().as_deref(), Some("[2]"));
        assert!(!dir.path().join("nested/deeper/timers.json.tmp").exists());
    }

    #[test]
    fn memory_storage_clones_share_state() {
        let storage = MemoryStorage::new();
        let other = storage.clone();
        other.save_collection("[]").unwrap();
        assert_eq!(storage.contents().as_deref(), Some("[]"));
    }
}
