//! Local key-value storage for state that survives restarts.
//!
//! [`JsonFileStore`] keeps every entry in one JSON object file and rewrites it
//! atomically (temp file + rename) on each `set`. [`MemoryStore`] is the
//! in-process stand-in used by tests and ephemeral sessions.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// String-keyed, string-valued storage scoped to one profile.
pub trait KeyValueStore: Send {
    /// Read an entry. `Ok(None)` when the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>, String>;

    /// Write an entry, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), String>;
}

/// In-memory store. Contents are lost when dropped.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a single JSON object file:
///
/// ```json
/// { "missionFavorites": "[1,4]" }
/// ```
///
/// The file is created on the first write. Values are stored as strings,
/// mirroring browser local storage.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, String> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| format!("Failed to read {}: {e}", self.path.display()))?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw)
            .map_err(|e| format!("Failed to parse {}: {e}", self.path.display()))
    }

    /// Atomic write: serialize to a temp file, then rename into place.
    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), String> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir)
                .map_err(|e| format!("Failed to create storage dir: {e}"))?;
        }

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "storage.json".to_string());
        let tmp_path = self.path.with_file_name(format!(".{file_name}.tmp"));

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| format!("Failed to serialize storage: {e}"))?;
        std::fs::write(&tmp_path, json)
            .map_err(|e| format!("Failed to write temp storage file: {e}"))?;
        std::fs::rename(&tmp_path, &self.path)
            .map_err(|e| format!("Failed to rename storage file: {e}"))?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        // A corrupt file is replaced rather than blocking every later write.
        let mut entries = self.read_all().unwrap_or_default();
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_get_set() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let mut store = JsonFileStore::new(&path);
        assert_eq!(store.get("missionFavorites").unwrap(), None);
        store.set("missionFavorites", "[1,2]").unwrap();
        store.set("other", "x").unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(
            reopened.get("missionFavorites").unwrap().as_deref(),
            Some("[1,2]")
        );
        assert_eq!(reopened.get("other").unwrap().as_deref(), Some("x"));
        assert!(!dir.path().join("nested").join(".storage.json.tmp").exists());
    }

    #[test]
    fn file_store_reports_corrupt_file_on_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "not json").unwrap();

        let mut store = JsonFileStore::new(&path);
        assert!(store.get("missionFavorites").is_err());

        // Writing replaces the corrupt contents.
        store.set("missionFavorites", "[3]").unwrap();
        assert_eq!(
            store.get("missionFavorites").unwrap().as_deref(),
            Some("[3]")
        );
    }
}
