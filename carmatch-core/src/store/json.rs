//! JSON-file preference store.

use camino::{Utf8Path, Utf8PathBuf};
use log::info;

use crate::{PersonaKey, PreferenceTable};

use super::{PreferenceStore, PreferenceStoreError};

/// Preference table persisted as a single JSON document.
///
/// The file holds `{ "<persona key>": { "<car>": <float> } }`. A missing
/// file is a normal first run and loads as an empty table; each flush
/// replaces the file atomically.
#[derive(Debug, Clone)]
pub struct JsonPreferenceStore {
    path: Utf8PathBuf,
    table: PreferenceTable,
}

impl JsonPreferenceStore {
    /// Create a store for `path` without touching the filesystem.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: PreferenceTable::new(),
        }
    }

    /// Create a store for `path` and load any persisted table.
    ///
    /// # Errors
    /// Returns [`PreferenceStoreError::Read`] or
    /// [`PreferenceStoreError::Decode`] when an existing file is unusable.
    pub fn open(path: impl Into<Utf8PathBuf>) -> Result<Self, PreferenceStoreError> {
        let mut store = Self::new(path);
        store.load()?;
        Ok(store)
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn load(&mut self) -> Result<(), PreferenceStoreError> {
        let contents = carmatch_fs::read_to_string_if_exists(&self.path).map_err(|source| {
            PreferenceStoreError::Read {
                path: self.path.clone(),
                source,
            }
        })?;
        let Some(json) = contents else {
            info!("no preference table at {}; starting empty", self.path);
            self.table = PreferenceTable::new();
            return Ok(());
        };
        self.table = serde_json::from_str(&json).map_err(|source| PreferenceStoreError::Decode {
            path: self.path.clone(),
            source,
        })?;
        info!(
            "loaded preferences for {} personas from {}",
            self.table.len(),
            self.path
        );
        Ok(())
    }

    fn table(&self) -> &PreferenceTable {
        &self.table
    }

    fn put(&mut self, key: PersonaKey, car: &str, value: f64) {
        self.table.set(key, car, value);
    }

    fn flush(&mut self) -> Result<(), PreferenceStoreError> {
        let bytes = serde_json::to_vec(&self.table)
            .map_err(|source| PreferenceStoreError::Encode { source })?;
        carmatch_fs::write_atomic(&self.path, &bytes).map_err(|source| {
            PreferenceStoreError::Write {
                path: self.path.clone(),
                source,
            }
        })?;
        info!("wrote preference table to {}", self.path);
        Ok(())
    }
}
