//! Storage for the learned preference table.
//!
//! The [`PreferenceStore`] trait separates the in-memory table used for
//! matching from the backend that persists it. Backends load the whole table
//! once and rewrite it in full on [`PreferenceStore::flush`]; there is no
//! locking, so concurrent writers lose updates (last writer wins).

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::{PersonaKey, PreferenceTable};

#[cfg(feature = "store-json")]
mod json;
#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-json")]
pub use json::JsonPreferenceStore;
#[cfg(feature = "store-sqlite")]
pub use sqlite::SqlitePreferenceStore;

/// Errors raised while loading or persisting a preference table.
#[derive(Debug, Error)]
pub enum PreferenceStoreError {
    /// Reading the persisted table failed.
    #[error("failed to read preference table at {path}")]
    Read {
        /// Location of the persisted table.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// The persisted table was not valid JSON of the expected shape.
    #[error("failed to decode preference table at {path}")]
    Decode {
        /// Location of the persisted table.
        path: Utf8PathBuf,
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// Encoding the table failed.
    #[error("failed to encode preference table")]
    Encode {
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// Writing the table failed.
    #[error("failed to write preference table to {path}")]
    Write {
        /// Location of the persisted table.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// A database operation failed.
    #[cfg(feature = "store-sqlite")]
    #[error("preference database {path} failed to {operation}")]
    Database {
        /// Location of the database.
        path: Utf8PathBuf,
        /// Description of the failed operation.
        operation: &'static str,
        /// Source error from `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
}

/// Load, query, update and persist the preference table.
///
/// Reads go through [`PreferenceStore::table`] so matchers can borrow the
/// whole table. Writes update memory immediately; durability only happens on
/// [`PreferenceStore::flush`], and a failed flush leaves the in-memory table
/// intact.
///
/// # Examples
///
/// ```rust
/// use carmatch_core::{MemoryPreferenceStore, PersonaKey, PreferenceStore};
///
/// # fn main() -> Result<(), carmatch_core::PreferenceStoreError> {
/// let mut store = MemoryPreferenceStore::default();
/// let key = PersonaKey::from_raw("k");
/// store.put(key.clone(), "Alto", 0.1);
/// store.flush()?;
/// assert_eq!(store.get(&key, "Alto"), Some(0.1));
/// # Ok(())
/// # }
/// ```
pub trait PreferenceStore {
    /// Replace the in-memory table with the persisted one.
    ///
    /// A backend with nothing persisted yet loads an empty table.
    ///
    /// # Errors
    /// Returns [`PreferenceStoreError`] when persisted data exists but cannot
    /// be read or decoded.
    fn load(&mut self) -> Result<(), PreferenceStoreError>;

    /// Borrow the current in-memory table.
    fn table(&self) -> &PreferenceTable;

    /// Return the stored value for `(key, car)`.
    fn get(&self, key: &PersonaKey, car: &str) -> Option<f64> {
        self.table().get(key, car)
    }

    /// Insert or overwrite the value for `(key, car)` in memory.
    fn put(&mut self, key: PersonaKey, car: &str, value: f64);

    /// Persist the whole table.
    ///
    /// # Errors
    /// Returns [`PreferenceStoreError`] when the backend rejects the write.
    fn flush(&mut self) -> Result<(), PreferenceStoreError>;
}

/// Process-local store whose flush is a no-op.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    table: PreferenceTable,
    flushes: usize,
}

impl MemoryPreferenceStore {
    /// Start from an existing table.
    #[must_use]
    pub const fn with_table(table: PreferenceTable) -> Self {
        Self { table, flushes: 0 }
    }

    /// Number of times [`PreferenceStore::flush`] has been called.
    #[must_use]
    pub const fn flush_count(&self) -> usize {
        self.flushes
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&mut self) -> Result<(), PreferenceStoreError> {
        Ok(())
    }

    fn table(&self) -> &PreferenceTable {
        &self.table
    }

    fn put(&mut self, key: PersonaKey, car: &str, value: f64) {
        self.table.set(key, car, value);
    }

    fn flush(&mut self) -> Result<(), PreferenceStoreError> {
        self.flushes = self.flushes.saturating_add(1);
        Ok(())
    }
}
