//! File-backed settings storage
//!
//! One file per key, named after the key (`personal_preset.bin`, ...).
//! Writes go to a temporary file that is renamed over the old value, so a
//! crash never leaves a half-written record behind.

use std::fs;
use std::io;
use std::path::PathBuf;

use breathe_hal::{KeyValueStore, MemoryStore, StorageError, StorageKey};
use tracing::{debug, warn};

/// Settings store in a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Use `dir`, created on the first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: StorageKey) -> PathBuf {
        self.dir.join(format!("{}.bin", key.as_str()))
    }
}

fn backend_error(key: StorageKey, e: io::Error) -> StorageError {
    warn!(key = key.as_str(), error = %e, "settings file error");
    StorageError::Backend
}

impl KeyValueStore for FileStore {
    fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, StorageError> {
        let data = match fs::read(self.path(key)) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(StorageError::NotFound),
            Err(e) => return Err(backend_error(key, e)),
        };
        if data.len() > buffer.len() {
            return Err(StorageError::BufferTooSmall);
        }
        buffer[..data.len()].copy_from_slice(&data);
        Ok(data.len())
    }

    fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|e| backend_error(key, e))?;

        let path = self.path(key);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, data).map_err(|e| backend_error(key, e))?;
        fs::rename(&tmp, &path).map_err(|e| backend_error(key, e))?;

        debug!(key = key.as_str(), len = data.len(), "settings written");
        Ok(())
    }

    fn exists(&mut self, key: StorageKey) -> bool {
        self.path(key).is_file()
    }

    fn erase_all(&mut self) -> Result<(), StorageError> {
        for key in StorageKey::ALL {
            match fs::remove_file(self.path(key)) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(backend_error(key, e)),
            }
        }
        Ok(())
    }
}

/// Storage chosen at startup
#[derive(Debug, Clone)]
pub enum HostStore {
    /// Persist to disk
    File(FileStore),
    /// Forget everything on exit (`--ephemeral`)
    Memory(MemoryStore),
}

impl KeyValueStore for HostStore {
    fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, StorageError> {
        match self {
            HostStore::File(store) => store.read(key, buffer),
            HostStore::Memory(store) => store.read(key, buffer),
        }
    }

    fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), StorageError> {
        match self {
            HostStore::File(store) => store.write(key, data),
            HostStore::Memory(store) => store.write(key, data),
        }
    }

    fn exists(&mut self, key: StorageKey) -> bool {
        match self {
            HostStore::File(store) => store.exists(key),
            HostStore::Memory(store) => store.exists(key),
        }
    }

    fn erase_all(&mut self) -> Result<(), StorageError> {
        match self {
            HostStore::File(store) => store.erase_all(),
            HostStore::Memory(store) => store.erase_all(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use breathe_core::config::{Field, PhaseConfig, PresetName, Settings, Theme};

    #[test]
    fn test_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        let mut buffer = [0u8; 16];
        assert_eq!(
            store.read(StorageKey::Theme, &mut buffer),
            Err(StorageError::NotFound)
        );
        assert!(!store.exists(StorageKey::Theme));
    }

    #[test]
    fn test_write_read_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));

        store.write(StorageKey::LastPreset, b"box").unwrap();
        assert!(dir.path().join("nested/last_preset.bin").is_file());
        assert!(!dir.path().join("nested/last_preset.tmp").exists());

        let mut buffer = [0u8; 16];
        let len = store.read(StorageKey::LastPreset, &mut buffer).unwrap();
        assert_eq!(&buffer[..len], b"box");
    }

    #[test]
    fn test_buffer_too_small() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        store.write(StorageKey::Theme, b"forest").unwrap();

        let mut buffer = [0u8; 3];
        assert_eq!(
            store.read(StorageKey::Theme, &mut buffer),
            Err(StorageError::BufferTooSmall)
        );
    }

    #[test]
    fn test_erase_all() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        store.write(StorageKey::Theme, b"zen").unwrap();
        store.erase_all().unwrap();
        assert!(!store.exists(StorageKey::Theme));
        // Erasing nothing is fine
        store.erase_all().unwrap();
    }

    #[test]
    fn test_settings_survive_restart() {
        let dir = tempfile::tempdir().unwrap();

        let mut settings = Settings::load(FileStore::new(dir.path()));
        settings.adjust(Field::Inhale, 2).unwrap();
        settings.adjust(Field::Hold2, 3).unwrap();
        settings.set_theme(Theme::Zen).unwrap();
        settings.select_preset(PresetName::Box).unwrap();
        drop(settings);

        let mut settings = Settings::load(FileStore::new(dir.path()));
        assert!(settings.take_load_issues().is_empty());
        assert_eq!(settings.active_preset(), PresetName::Box);
        assert_eq!(settings.theme(), Theme::Zen);
        assert_eq!(
            settings.preset_phases(PresetName::Personal),
            PhaseConfig::new(7, 0, 5, 3)
        );
    }

    #[test]
    fn test_ephemeral_store() {
        let mut store = HostStore::Memory(MemoryStore::new());
        store.write(StorageKey::Theme, b"zen").unwrap();
        assert!(store.exists(StorageKey::Theme));
    }
}
