//! File-based key-value storage.
//!
//! Each key is a JSON file in the data directory (`~/.farsight/data/` by
//! default). Writes go to a temp file that is then renamed over the target,
//! so readers always see a complete snapshot.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::data_dir;
use crate::error::{FarsightError, Result};
use crate::storage::KvStore;

/// File-based key-value store.
#[derive(Debug, Clone)]
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    /// Create a store in the default data directory.
    pub fn new() -> Result<Self> {
        let dir = data_dir().ok_or_else(|| {
            FarsightError::config("Could not determine data directory (no home directory)")
        })?;
        Self::with_dir(dir)
    }

    /// Create a store in a custom directory, creating it if needed.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();

        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| FarsightError::storage(&dir, e))?;
        }

        Ok(Self { dir })
    }

    /// Directory holding the key files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!(".{}.json.tmp", key))
    }

    fn atomic_write(&self, key: &str, value: &str) -> Result<()> {
        let final_path = self.key_path(key);
        let temp_path = self.temp_path(key);

        {
            let mut file =
                fs::File::create(&temp_path).map_err(|e| FarsightError::storage(&temp_path, e))?;
            file.write_all(value.as_bytes())
                .map_err(|e| FarsightError::storage(&temp_path, e))?;
            file.sync_all()
                .map_err(|e| FarsightError::storage(&temp_path, e))?;
        }

        fs::rename(&temp_path, &final_path).map_err(|e| FarsightError::storage(&final_path, e))?;

        Ok(())
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| FarsightError::storage(&path, e))?;
        Ok(Some(content))
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.atomic_write(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);

        if path.exists() {
            fs::remove_file(&path).map_err(|e| FarsightError::storage(&path, e))?;
        }

        // Leftover from an interrupted write
        let temp_path = self.temp_path(key);
        if temp_path.exists() {
            let _ = fs::remove_file(&temp_path);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::traits::tests::test_kv_store_roundtrip;
    use tempfile::TempDir;

    fn create_test_store() -> (FileKvStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = FileKvStore::with_dir(dir.path()).unwrap();
        (store, dir)
    }

    #[test]
    fn test_file_store_roundtrip() {
        let (store, _dir) = create_test_store();
        test_kv_store_roundtrip(&store);
    }

    #[test]
    fn test_with_dir_creates_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("data");
        assert!(!nested.exists());

        let _store = FileKvStore::with_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_key_path() {
        let (store, _dir) = create_test_store();
        assert!(store
            .key_path("vision_quest_stats")
            .ends_with("vision_quest_stats.json"));
    }

    #[test]
    fn test_temp_file_cleaned_up() {
        let (store, _dir) = create_test_store();
        store.put("vision_quest_stats", "{}").unwrap();
        assert!(!store.temp_path("vision_quest_stats").exists());
        assert!(store.key_path("vision_quest_stats").exists());
    }

    #[test]
    fn test_remove_deletes_stale_temp_file() {
        let (store, _dir) = create_test_store();
        fs::write(store.temp_path("vision_quest_stats"), "partial").unwrap();

        store.remove("vision_quest_stats").unwrap();
        assert!(!store.temp_path("vision_quest_stats").exists());
    }

    #[test]
    fn test_values_survive_new_handle() {
        let (store, dir) = create_test_store();
        store.put("vision_quest_settings", r#"{"soundEnabled":false}"#).unwrap();

        let reopened = FileKvStore::with_dir(dir.path()).unwrap();
        assert_eq!(
            reopened.get("vision_quest_settings").unwrap().as_deref(),
            Some(r#"{"soundEnabled":false}"#)
        );
    }
}
