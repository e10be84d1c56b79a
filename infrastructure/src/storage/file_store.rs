//! Per-origin JSON file store.
//!
//! Each origin owns one file, `<dir>/<origin>.json`, holding a flat JSON
//! object of string keys to string values. The whole object is rewritten
//! on every write: into a uniquely named temporary sibling, then renamed
//! over the original so readers never see a half-written file.
//!
//! Writers hold an exclusive advisory lock on `<dir>/<origin>.json.lock`
//! for the whole read-modify-write, so several stores (or processes) on
//! the same origin never lose each other's updates.

use fd_lock::RwLock;
use outlog_application::{KeyValueStore, StoreError};
use outlog_domain::{Origin, StorageKey};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, trace};

type Entries = BTreeMap<String, String>;

/// Persistent string store backed by one JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Open the store for `origin` inside `dir`, creating `dir` if needed.
    pub fn open(dir: impl AsRef<Path>, origin: &Origin) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.json", origin));
        debug!("Opened file store at {}", path.display());
        Ok(Self::at(path))
    }

    /// Use an explicit file path. Nothing is created until the first write.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default directory for store files: `<data_dir>/outlog`.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("outlog"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file that carries the writer lock.
    pub fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn read_entries(&self) -> Result<Entries, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(e.into()),
        };
        if text.trim().is_empty() {
            return Ok(Entries::new());
        }
        serde_json::from_str(&text).map_err(|e| StoreError::Corrupt {
            location: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(entries).map_err(|e| StoreError::Corrupt {
            location: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        let mut tmp = NamedTempFile::new_in(self.dir())?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        trace!(entries = entries.len(), "Wrote {}", self.path.display());
        Ok(())
    }

    /// Run a read-modify-write of the entries under the writer lock.
    fn modify<T>(
        &self,
        change: impl FnOnce(&mut Entries) -> (T, bool),
    ) -> Result<T, StoreError> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())?;
        let mut lock: RwLock<File> = RwLock::new(file);
        let _held = lock.write()?;

        let mut entries = self.read_entries()?;
        let (result, changed) = change(&mut entries);
        if changed {
            self.write_entries(&entries)?;
        }
        Ok(result)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &StorageKey) -> Result<Option<String>, StoreError> {
        Ok(self.read_entries()?.remove(key.as_str()))
    }

    fn set(&self, key: &StorageKey, value: &str) -> Result<(), StoreError> {
        self.modify(|entries| {
            entries.insert(key.as_str().to_string(), value.to_string());
            ((), true)
        })
    }

    fn remove(&self, key: &StorageKey) -> Result<(), StoreError> {
        self.modify(|entries| ((), entries.remove(key.as_str()).is_some()))
    }

    fn update(
        &self,
        key: &StorageKey,
        apply: &mut dyn FnMut(Option<String>) -> String,
    ) -> Result<String, StoreError> {
        self.modify(|entries| {
            let value = apply(entries.remove(key.as_str()));
            entries.insert(key.as_str().to_string(), value.clone());
            (value, true)
        })
    }

    fn describe(&self) -> String {
        format!("file store {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outlog_application::{Logger, SinkConfig};
    use std::sync::Arc;

    fn key(name: &str) -> StorageKey {
        StorageKey::new(name).unwrap()
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path(), &Origin::default()).unwrap();
        assert_eq!(store.get(&key("wasm_output")).unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let origin = Origin::new("example.com").unwrap();
        {
            let store = FileStore::open(dir.path(), &origin).unwrap();
            store.set(&key("wasm_output"), "a\nb\n").unwrap();
        }
        let store = FileStore::open(dir.path(), &origin).unwrap();
        assert_eq!(
            store.get(&key("wasm_output")).unwrap().as_deref(),
            Some("a\nb\n")
        );
        assert_eq!(store.path(), dir.path().join("example.com.json"));
    }

    #[test]
    fn test_origins_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let a = FileStore::open(dir.path(), &Origin::new("a").unwrap()).unwrap();
        let b = FileStore::open(dir.path(), &Origin::new("b").unwrap()).unwrap();
        a.set(&key("k"), "from a").unwrap();
        assert_eq!(b.get(&key("k")).unwrap(), None);
    }

    #[test]
    fn test_keys_share_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path(), &Origin::default()).unwrap();
        store.set(&key("one"), "1").unwrap();
        store.set(&key("two"), "2").unwrap();
        store.remove(&key("one")).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let parsed: Entries = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.get("two").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path(), &Origin::default()).unwrap();
        store.set(&key("k"), "v").unwrap();
        store.set(&key("k"), "w").unwrap();

        let mut names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["default.json", "default.json.lock"]);
    }

    #[test]
    fn test_update_appends_to_current_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path(), &Origin::default()).unwrap();
        store.set(&key("k"), "a\n").unwrap();
        let value = store
            .update(&key("k"), &mut |current: Option<String>| {
                format!("{}b\n", current.unwrap_or_default())
            })
            .unwrap();
        assert_eq!(value, "a\nb\n");
        assert_eq!(store.get(&key("k")).unwrap().as_deref(), Some("a\nb\n"));
    }

    #[test]
    fn test_separate_stores_on_one_file_keep_every_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shared.json");

        let handles: Vec<_> = (0..2)
            .map(|t| {
                let logger = Logger::open(Arc::new(FileStore::at(&path)), SinkConfig::default());
                std::thread::spawn(move || {
                    for i in 0..50 {
                        logger.try_emit(&format!("w{}-{}", t, i)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let reader = Logger::open(Arc::new(FileStore::at(&path)), SinkConfig::default());
        let buffer = reader.try_buffer().unwrap();
        assert_eq!(buffer.line_count(), 100);
        for t in 0..2 {
            let ours: Vec<_> = buffer
                .lines()
                .filter(|l| l.starts_with(&format!("w{}-", t)))
                .collect();
            let expected: Vec<_> = (0..50).map(|i| format!("w{}-{}", t, i)).collect();
            assert_eq!(ours, expected);
        }
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "not json").unwrap();
        let store = FileStore::at(&path);
        let err = store.get(&key("k")).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
        assert!(store.set(&key("k"), "v").is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "not json");
    }

    #[test]
    fn test_blank_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.json");
        fs::write(&path, "\n").unwrap();
        let store = FileStore::at(&path);
        assert_eq!(store.get(&key("k")).unwrap(), None);
    }
}
