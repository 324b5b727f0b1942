//! File-based checkpoint store.
//!
//! One file per website, named `<input><site id>`, holding a single JSON
//! integer.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{CheckpointError, CheckpointKey, CheckpointStore};

/// Stores each checkpoint as a file in a checkpoint directory.
///
/// Writes go to a `.tmp` sibling first and are renamed into place, so a
/// crash mid-write leaves the previous checkpoint intact.
#[derive(Debug, Clone)]
pub struct FileCheckpointStore {
    dir: PathBuf,
}

impl FileCheckpointStore {
    /// Create a store rooted at `dir`. The directory is created on first save.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the checkpoint file for `key`.
    pub fn path_for(&self, key: &CheckpointKey) -> PathBuf {
        self.dir.join(key.to_string())
    }
}

impl CheckpointStore for FileCheckpointStore {
    fn load(&self, key: &CheckpointKey) -> Result<i64, CheckpointError> {
        let path = self.path_for(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CheckpointError::NotFound(key.clone()))
            }
            Err(source) => return Err(CheckpointError::Io { path, source }),
        };

        serde_json::from_str::<i64>(content.trim()).map_err(|e| CheckpointError::Corrupt {
            path,
            reason: e.to_string(),
        })
    }

    fn save(&mut self, key: &CheckpointKey, timestamp: i64) -> Result<(), CheckpointError> {
        fs::create_dir_all(&self.dir).map_err(io_error(&self.dir))?;

        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{}.tmp", key));
        let json = serde_json::to_string(&timestamp).map_err(|e| CheckpointError::Corrupt {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        fs::write(&tmp, json).map_err(io_error(&tmp))?;
        fs::rename(&tmp, &path).map_err(io_error(&path))?;
        Ok(())
    }

    fn clear(&mut self, key: &CheckpointKey) -> Result<bool, CheckpointError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(CheckpointError::Io { path, source }),
        }
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> CheckpointError {
    let path = path.to_path_buf();
    move |source| CheckpointError::Io { path, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_path_concatenates_input_and_site() {
        let store = FileCheckpointStore::new("/var/lib/checkpoints");
        let key = CheckpointKey::new("prod", 42);
        assert_eq!(store.path_for(&key), Path::new("/var/lib/checkpoints/prod42"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut store = FileCheckpointStore::new(dir.path());
        let key = CheckpointKey::new("prod", 7);

        store.save(&key, 1_700_000_000).unwrap();

        assert_eq!(store.load(&key).unwrap(), 1_700_000_000);
        let raw = fs::read_to_string(dir.path().join("prod7")).unwrap();
        assert_eq!(raw, "1700000000");
        assert!(!dir.path().join("prod7.tmp").exists());
    }

    #[test]
    fn test_save_creates_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let mut store = FileCheckpointStore::new(&nested);

        store.save(&CheckpointKey::new("x", 1), 60).unwrap();
        assert!(nested.join("x1").exists());
    }

    #[test]
    fn test_load_missing() {
        let dir = TempDir::new().unwrap();
        let store = FileCheckpointStore::new(dir.path());

        let err = store.load(&CheckpointKey::new("prod", 1)).unwrap_err();
        assert!(matches!(err, CheckpointError::NotFound(_)));
    }

    #[test]
    fn test_load_corrupt() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("prod1"), "not a number").unwrap();
        let store = FileCheckpointStore::new(dir.path());

        let err = store.load(&CheckpointKey::new("prod", 1)).unwrap_err();
        assert!(matches!(err, CheckpointError::Corrupt { .. }));
    }

    #[test]
    fn test_load_tolerates_trailing_newline() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("prod1"), "1700000000\n").unwrap();
        let store = FileCheckpointStore::new(dir.path());

        assert_eq!(store.load(&CheckpointKey::new("prod", 1)).unwrap(), 1_700_000_000);
    }

    #[test]
    fn test_clear() {
        let dir = TempDir::new().unwrap();
        let mut store = FileCheckpointStore::new(dir.path());
        let key = CheckpointKey::new("prod", 3);

        assert!(!store.clear(&key).unwrap());
        store.save(&key, 120).unwrap();
        assert!(store.clear(&key).unwrap());
        assert!(store.load(&key).is_err());
    }
}
