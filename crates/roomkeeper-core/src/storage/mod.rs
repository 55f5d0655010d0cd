mod config;
pub mod database;
pub mod slots;

pub use config::{AdminConfig, Config, HintsConfig, PresentationConfig, PresentationMode, TimerConfig};
pub use database::Database;
pub use slots::Slot;

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::StorageError;

/// Named-slot persistence port.
///
/// Each slot is owned by exactly one component and written
/// last-writer-wins; there is no grouping across slots.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Process-local store; contents vanish with the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Returns the data directory, creating it when missing.
///
/// `ROOMKEEPER_DATA_DIR` wins when set. Otherwise `~/.config/roomkeeper`,
/// or `~/.config/roomkeeper-dev` with `ROOMKEEPER_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("ROOMKEEPER_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("ROOMKEEPER_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("roomkeeper-dev")
            } else {
                base_dir.join("roomkeeper")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
