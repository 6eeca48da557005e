//! In-memory key-value store
//!
//! Fixed-capacity backend with no persistence. Used for ephemeral runs
//! and as the storage fake in tests.

use heapless::Vec;

use crate::storage::{KeyValueStore, StorageError, StorageKey};

/// Maximum size of a single stored value
pub const MAX_VALUE_SIZE: usize = 64;

/// Key-value store backed by fixed buffers
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: [Option<Vec<u8, MAX_VALUE_SIZE>>; StorageKey::COUNT],
    /// Number of successful writes (for assertions in tests)
    writes: u32,
    /// Refuse all writes with `StorageError::Backend`
    read_only: bool,
}

impl MemoryStore {
    /// Create an empty store
    pub const fn new() -> Self {
        Self {
            slots: [None, None, None],
            writes: 0,
            read_only: false,
        }
    }

    /// Create a store that rejects every write
    pub const fn read_only() -> Self {
        Self {
            slots: [None, None, None],
            writes: 0,
            read_only: true,
        }
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> u32 {
        self.writes
    }

    /// Raw stored bytes for a key
    pub fn get(&self, key: StorageKey) -> Option<&[u8]> {
        self.slots[key.as_u8() as usize].as_deref()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, StorageError> {
        let value = self.get(key).ok_or(StorageError::NotFound)?;
        if value.len() > buffer.len() {
            return Err(StorageError::BufferTooSmall);
        }
        buffer[..value.len()].copy_from_slice(value);
        Ok(value.len())
    }

    fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::Backend);
        }
        let value = Vec::from_slice(data).map_err(|_| StorageError::Full)?;
        self.slots[key.as_u8() as usize] = Some(value);
        self.writes += 1;
        Ok(())
    }

    fn exists(&mut self, key: StorageKey) -> bool {
        self.get(key).is_some()
    }

    fn erase_all(&mut self) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::Backend);
        }
        self.slots = [None, None, None];
        Ok(())
    }
}
