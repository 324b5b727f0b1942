//! In-memory checkpoint store.

use std::collections::BTreeMap;

use super::{CheckpointError, CheckpointKey, CheckpointStore};

/// Keeps checkpoints in a map. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryCheckpointStore {
    entries: BTreeMap<CheckpointKey, i64>,
}

impl MemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a checkpoint.
    pub fn with_checkpoint(mut self, key: CheckpointKey, timestamp: i64) -> Self {
        self.entries.insert(key, timestamp);
        self
    }

    /// Current checkpoint for `key`, if any.
    pub fn get(&self, key: &CheckpointKey) -> Option<i64> {
        self.entries.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CheckpointStore for MemoryCheckpointStore {
    fn load(&self, key: &CheckpointKey) -> Result<i64, CheckpointError> {
        self.get(key)
            .ok_or_else(|| CheckpointError::NotFound(key.clone()))
    }

    fn save(&mut self, key: &CheckpointKey, timestamp: i64) -> Result<(), CheckpointError> {
        self.entries.insert(key.clone(), timestamp);
        Ok(())
    }

    fn clear(&mut self, key: &CheckpointKey) -> Result<bool, CheckpointError> {
        Ok(self.entries.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let key = CheckpointKey::new("prod", 9);
        let mut store = MemoryCheckpointStore::new();

        assert!(matches!(store.load(&key), Err(CheckpointError::NotFound(_))));
        store.save(&key, 300).unwrap();
        assert_eq!(store.load(&key).unwrap(), 300);
        assert_eq!(store.len(), 1);
        assert!(store.clear(&key).unwrap());
        assert!(store.is_empty());
    }
}
