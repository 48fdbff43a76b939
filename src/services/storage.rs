use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("failed to write key {key}: {reason}")]
    Write { key: String, reason: String },
}

/// Key/value JSON storage, the localStorage analog. Absent or malformed
/// entries fall back to a caller-supplied default; write failures are
/// reported but callers keep their in-memory state authoritative.
pub trait Store {
    fn load_raw(&self, key: &str) -> Option<String>;
    fn save_raw(&mut self, key: &str, raw: String) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str);

    fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.load_raw(key) {
            Some(raw) => serde_json::from_str(&raw).unwrap_or(default),
            None => default,
        }
    }

    fn save<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(value).map_err(|e| StorageError::Write {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.save_raw(key, raw)
    }
}

/// One `<key>.json` file per storage key under the session root.
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn open(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

impl Store for FsStore {
    fn load_raw(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.key_path(key)).ok()
    }

    fn save_raw(&mut self, key: &str, raw: String) -> Result<(), StorageError> {
        let write = |path: &Path| -> std::io::Result<()> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, raw.as_bytes())
        };
        write(&self.key_path(key)).map_err(|e| StorageError::Write {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    fn remove(&mut self, key: &str) {
        let _ = std::fs::remove_file(self.key_path(key));
    }
}

/// In-memory store for tests; can be switched to refuse writes.
#[derive(Default)]
pub struct MemStore {
    entries: HashMap<String, String>,
    pub fail_writes: bool,
}

impl Store for MemStore {
    fn load_raw(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn save_raw(&mut self, key: &str, raw: String) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Write {
                key: key.to_string(),
                reason: "write disabled".to_string(),
            });
        }
        self.entries.insert(key.to_string(), raw);
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

pub fn store_root() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home)
        .join(".local")
        .join("share")
        .join("treadmark")
        .join("store"))
}

pub fn now_ts() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Best-effort session event log (JSONL). Never fails a command.
pub fn log_event(root: &Path, action: &str, data: serde_json::Value) {
    let event = serde_json::json!({
        "ts": now_ts(),
        "action": action,
        "data": data
    });
    let path = root.join("events.jsonl");
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let line = format!("{}\n", event);
    let _ = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut f| std::io::Write::write_all(&mut f, line.as_bytes()));
}

#[cfg(test)]
mod tests {
    use super::{MemStore, Store};

    #[test]
    fn load_returns_default_for_missing_key() {
        let store = MemStore::default();
        let v: Vec<u64> = store.load("cart", vec![7]);
        assert_eq!(v, vec![7]);
    }

    #[test]
    fn load_returns_default_for_corrupt_json() {
        let mut store = MemStore::default();
        store
            .save_raw("cart", "{not json".to_string())
            .expect("raw write");
        let v: Vec<u64> = store.load("cart", Vec::new());
        assert!(v.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut store = MemStore::default();
        store.save("cart", &vec![1u64, 2, 3]).expect("save");
        let v: Vec<u64> = store.load("cart", Vec::new());
        assert_eq!(v, vec![1, 2, 3]);
    }

    #[test]
    fn failed_write_surfaces_storage_error() {
        let mut store = MemStore {
            fail_writes: true,
            ..Default::default()
        };
        assert!(store.save("cart", &1u64).is_err());
    }

    #[test]
    fn remove_drops_the_key() {
        let mut store = MemStore::default();
        store.save("last_added", &"x").expect("save");
        store.remove("last_added");
        assert!(store.load_raw("last_added").is_none());
    }
}
