use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::repository::{KeyValueStore, StorageError};

/// Slots stored as one JSON file per key inside a data directory.
///
/// Keys are escaped reversibly into file names: bytes outside `[A-Za-z0-9-.]`
/// become `_XX` (uppercase hex), so `gaia:web-awakening:study-engine` lands in
/// `gaia_3Aweb-awakening_3Astudy-engine.json` and distinct keys never share a file.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len());
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.') {
                name.push(char::from(byte));
            } else {
                name.push_str(&format!("_{byte:02X}"));
            }
        }
        self.dir.join(format!("{name}.json"))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        // Write beside the target and rename so readers never see half a value.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        debug!(key, path = %path.display(), bytes = value.len(), "slot written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_namespaced_keys_to_file_names() {
        let store = FileKeyValueStore::new("/data");
        assert_eq!(
            store.path_for("gaia:web-awakening:study-engine"),
            PathBuf::from("/data/gaia_3Aweb-awakening_3Astudy-engine.json")
        );
        assert_eq!(
            store.path_for("gaia/../x"),
            PathBuf::from("/data/gaia_2F.._2Fx.json")
        );
    }

    #[test]
    fn similar_keys_do_not_share_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path());
        assert_ne!(store.path_for("a:b"), store.path_for("a_b"));

        store.set("a:b", "colon").unwrap();
        store.set("a_b", "underscore").unwrap();
        assert_eq!(store.get("a:b").unwrap().as_deref(), Some("colon"));
        assert_eq!(store.get("a_b").unwrap().as_deref(), Some("underscore"));
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path().join("nested"));
        assert_eq!(store.get("a:b").unwrap(), None);

        store.set("a:b", "{\"x\":1}").unwrap();
        assert_eq!(store.get("a:b").unwrap().as_deref(), Some("{\"x\":1}"));

        // A second store over the same directory sees the value.
        let reopened = FileKeyValueStore::new(dir.path().join("nested"));
        assert_eq!(reopened.get("a:b").unwrap().as_deref(), Some("{\"x\":1}"));

        store.remove("a:b").unwrap();
        store.remove("a:b").unwrap();
        assert_eq!(reopened.get("a:b").unwrap(), None);
    }
}
