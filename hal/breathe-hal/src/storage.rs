//! Key-value storage abstractions
//!
//! Provides the trait for persistent settings storage. A browser keeps
//! these in local storage, a board in flash, the host widget in files.

use core::fmt;

/// Storage keys for persisted settings
///
/// Each key identifies one independently written record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StorageKey {
    /// The personal preset's four phase values (binary postcard record)
    PersonalPreset = 0,
    /// Name of the last selected preset
    LastPreset = 1,
    /// Name of the last selected visual theme
    Theme = 2,
}

impl StorageKey {
    /// Number of distinct keys
    pub const COUNT: usize = 3;

    /// All keys in storage order
    pub const ALL: [StorageKey; Self::COUNT] = [
        StorageKey::PersonalPreset,
        StorageKey::LastPreset,
        StorageKey::Theme,
    ];

    /// Get the key as a byte value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create a key from a byte value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(StorageKey::PersonalPreset),
            1 => Some(StorageKey::LastPreset),
            2 => Some(StorageKey::Theme),
            _ => None,
        }
    }

    /// String name of the key, used by string-keyed backends
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::PersonalPreset => "personal_preset",
            StorageKey::LastPreset => "last_preset",
            StorageKey::Theme => "theme",
        }
    }

    /// Look a key up by its string name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|key| key.as_str() == name)
    }
}

/// Errors from storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Backend operation failed (I/O, permissions, quota)
    Backend,
    /// Key not found
    NotFound,
    /// Buffer too small for the data
    BufferTooSmall,
    /// Data corrupted or invalid
    Corrupted,
    /// Storage is full
    Full,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StorageError::Backend => "storage backend failure",
            StorageError::NotFound => "key not found",
            StorageError::BufferTooSmall => "buffer too small",
            StorageError::Corrupted => "stored data corrupted",
            StorageError::Full => "storage full",
        };
        f.write_str(text)
    }
}

/// Key-value storage trait
///
/// Writes replace the previous value for the key. The breathing timer
/// is cooperative and single threaded, so the interface is synchronous.
pub trait KeyValueStore {
    /// Read a value by key into the provided buffer
    ///
    /// # Returns
    /// The number of bytes read, [`StorageError::NotFound`] for a missing
    /// key, or [`StorageError::BufferTooSmall`] if the value does not fit.
    fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, StorageError>;

    /// Write a value by key
    fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), StorageError>;

    /// Check if a key exists in storage
    fn exists(&mut self, key: StorageKey) -> bool;

    /// Remove all stored values
    fn erase_all(&mut self) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &mut T {
    fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, StorageError> {
        (**self).read(key, buffer)
    }

    fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), StorageError> {
        (**self).write(key, data)
    }

    fn exists(&mut self, key: StorageKey) -> bool {
        (**self).exists(key)
    }

    fn erase_all(&mut self) -> Result<(), StorageError> {
        (**self).erase_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_byte_roundtrip() {
        for key in StorageKey::ALL {
            assert_eq!(StorageKey::from_u8(key.as_u8()), Some(key));
        }
        assert_eq!(StorageKey::from_u8(0xFF), None);
    }

    #[test]
    fn test_key_names_are_unique() {
        for key in StorageKey::ALL {
            assert_eq!(StorageKey::from_name(key.as_str()), Some(key));
        }
        assert_eq!(StorageKey::from_name("bb_unknown"), None);
    }
}
