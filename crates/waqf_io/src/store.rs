//! Key-value persistence for portfolio snapshots.
//!
//! - `get` returns `Ok(None)` for an unknown session.
//! - `set` replaces any previous value (last write wins).
//! - `FileStore` keeps one canonical JSON file per session, written atomically.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use serde_json::Value;
use waqf_core::SessionId;

use crate::canonical_json::write_canonical_file;
use crate::IoResult;

pub trait SnapshotStore {
    fn get(&self, key: &SessionId) -> IoResult<Option<Value>>;
    fn set(&mut self, key: &SessionId, value: &Value) -> IoResult<()>;
}

/// In-process store; clones values in and out.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<SessionId, Value>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

impl SnapshotStore for MemoryStore {
    fn get(&self, key: &SessionId) -> IoResult<Option<Value>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &SessionId, value: &Value) -> IoResult<()> {
        self.entries.insert(key.clone(), value.clone());
        Ok(())
    }
}

/// Directory-backed store: `<root>/<session>.json`.
///
/// Session tokens are restricted to `[A-Za-z0-9_.:-]`, so they cannot
/// escape `root`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, key: &SessionId) -> PathBuf {
        self.root.join(format!("{}.json", key.as_str()))
    }
}

impl SnapshotStore for FileStore {
    fn get(&self, key: &SessionId) -> IoResult<Option<Value>> {
        let path = self.path_for(key);
        let text = match fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(session = %key, path = %path.display(), "no snapshot");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(session = %key, path = %path.display(), "snapshot read");
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn set(&mut self, key: &SessionId, value: &Value) -> IoResult<()> {
        let path = self.path_for(key);
        write_canonical_file(&path, value)?;
        tracing::debug!(session = %key, path = %path.display(), "snapshot written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key(s: &str) -> SessionId { s.parse().unwrap() }

    #[test]
    fn memory_store_last_write_wins() {
        let mut s = MemoryStore::new();
        assert_eq!(s.get(&key("k")).unwrap(), None);
        s.set(&key("k"), &json!({"v": 1})).unwrap();
        s.set(&key("k"), &json!({"v": 2})).unwrap();
        assert_eq!(s.get(&key("k")).unwrap(), Some(json!({"v": 2})));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = FileStore::new(dir.path().join("snaps"));
        assert_eq!(s.get(&key("donor-1")).unwrap(), None);
        s.set(&key("donor-1"), &json!({"b": 2, "a": 1})).unwrap();
        let raw = fs::read_to_string(s.path_for(&key("donor-1"))).unwrap();
        assert_eq!(raw, r#"{"a":1,"b":2}"#);
        assert_eq!(s.get(&key("donor-1")).unwrap(), Some(json!({"a": 1, "b": 2})));
    }
}
