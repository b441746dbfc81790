//! Durable key-value slot holding the last viewed record.
//!
//! [`SlotStore`] is the raw string slot; [`WeatherStore`] layers the record
//! (de)serialization and load-time validation on top of it.

use anyhow::{Context, Result};
use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::{debug, warn};

use crate::model::WeatherRecord;

/// Slot key used for the persisted record.
pub const SLOT_KEY: &str = "weatherAppInfo";

/// Minimal synchronous key-value storage.
pub trait SlotStore {
    /// Read a slot; `None` when the key is absent.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Write a slot, replacing any prior value.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a slot. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// One JSON file per key under a base directory.
#[derive(Debug, Clone)]
pub struct FileSlotStore {
    base_path: PathBuf,
}

impl FileSlotStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self { base_path: base_path.into() }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{key}.json"))
    }
}

impl SlotStore for FileSlotStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read slot file: {}", path.display())),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.base_path).with_context(|| {
            format!("Failed to create data directory: {}", self.base_path.display())
        })?;

        let path = self.slot_path(key);
        fs::write(&path, value)
            .with_context(|| format!("Failed to write slot file: {}", path.display()))
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.slot_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to delete slot file: {}", path.display()))
            }
        }
    }
}

/// In-process slots; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemorySlotStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.slots.lock().map_err(|_| anyhow::anyhow!("Memory slot store lock poisoned"))
    }
}

impl SlotStore for MemorySlotStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.slots()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.slots()?.remove(key);
        Ok(())
    }
}

impl<S: SlotStore + ?Sized> SlotStore for &S {
    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Persists zero or one [`WeatherRecord`] in the [`SLOT_KEY`] slot.
#[derive(Debug)]
pub struct WeatherStore<S> {
    slots: S,
}

impl<S: SlotStore> WeatherStore<S> {
    pub fn new(slots: S) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &S {
        &self.slots
    }

    /// Present: overwrite the slot. Absent: delete it.
    pub fn save(&self, record: Option<&WeatherRecord>) -> Result<()> {
        match record {
            Some(record) => {
                let json = serde_json::to_string(record)
                    .context("Failed to serialize weather record to JSON")?;
                self.slots.write(SLOT_KEY, &json)?;
                debug!(city = %record.city, "persisted weather record");
            }
            None => {
                self.slots.remove(SLOT_KEY)?;
                debug!("cleared persisted weather record");
            }
        }
        Ok(())
    }

    /// Load the persisted record. Payloads that don't parse or validate count as absent.
    pub fn load(&self) -> Result<Option<WeatherRecord>> {
        let Some(raw) = self.slots.read(SLOT_KEY)? else {
            return Ok(None);
        };

        let record: WeatherRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "ignoring unparseable persisted weather record");
                return Ok(None);
            }
        };

        if let Err(e) = record.validate() {
            warn!(error = %e, "ignoring invalid persisted weather record");
            return Ok(None);
        }

        Ok(Some(record))
    }
}
