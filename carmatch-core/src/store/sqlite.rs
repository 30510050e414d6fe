//! SQLite-backed preference store.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use log::info;
use rusqlite::{Connection, params};

use crate::{PersonaKey, PreferenceTable};

use super::{PreferenceStore, PreferenceStoreError};

const CREATE_SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS preferences (
        persona_key TEXT NOT NULL,
        car_name TEXT NOT NULL,
        score REAL NOT NULL,
        PRIMARY KEY (persona_key, car_name)
    )";
const SELECT_ALL_SQL: &str =
    "SELECT persona_key, car_name, score FROM preferences ORDER BY persona_key, car_name";
const UPSERT_SQL: &str = "INSERT INTO preferences (persona_key, car_name, score)
     VALUES (?1, ?2, ?3)
     ON CONFLICT (persona_key, car_name) DO UPDATE SET score = excluded.score";

/// Preference table persisted in a `preferences` SQLite table.
///
/// Each `(persona_key, car_name)` pair is one row. Flushing upserts every
/// in-memory entry inside a single transaction.
pub struct SqlitePreferenceStore {
    connection: Connection,
    path: Utf8PathBuf,
    table: PreferenceTable,
}

impl fmt::Debug for SqlitePreferenceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlitePreferenceStore")
            .field("path", &self.path)
            .field("personas", &self.table.len())
            .finish_non_exhaustive()
    }
}

impl SqlitePreferenceStore {
    /// Open (creating if needed) the database at `path` and load its rows.
    ///
    /// # Errors
    /// Returns [`PreferenceStoreError::Write`] when the parent directory cannot
    /// be created and [`PreferenceStoreError::Database`] for SQLite failures.
    pub fn open(path: impl Into<Utf8PathBuf>) -> Result<Self, PreferenceStoreError> {
        let db_path = path.into();
        carmatch_fs::ensure_parent_dir(&db_path).map_err(|source| PreferenceStoreError::Write {
            path: db_path.clone(),
            source,
        })?;
        let connection = Connection::open(db_path.as_std_path())
            .map_err(|source| database_error(&db_path, "open", source))?;
        let mut store = Self {
            connection,
            path: db_path,
            table: PreferenceTable::new(),
        };
        store.ensure_schema()?;
        store.load()?;
        Ok(store)
    }

    /// Location of the database file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn ensure_schema(&self) -> Result<(), PreferenceStoreError> {
        self.connection
            .execute(CREATE_SCHEMA_SQL, [])
            .map(|_| ())
            .map_err(|source| database_error(&self.path, "create schema", source))
    }

    fn read_rows(&self) -> Result<PreferenceTable, rusqlite::Error> {
        let mut statement = self.connection.prepare(SELECT_ALL_SQL)?;
        let rows = statement.query_map([], |row| {
            let key: String = row.get(0)?;
            let car: String = row.get(1)?;
            let score: f64 = row.get(2)?;
            Ok((key, car, score))
        })?;
        let mut table = PreferenceTable::new();
        for row in rows {
            let (key, car, score) = row?;
            table.set(PersonaKey::from_raw(key), car, score);
        }
        Ok(table)
    }

    fn write_rows(&mut self) -> Result<(), rusqlite::Error> {
        let transaction = self.connection.transaction()?;
        {
            let mut statement = transaction.prepare(UPSERT_SQL)?;
            for (key, car, score) in self.table.entries() {
                statement.execute(params![key.as_str(), car, score])?;
            }
        }
        transaction.commit()
    }
}

impl PreferenceStore for SqlitePreferenceStore {
    fn load(&mut self) -> Result<(), PreferenceStoreError> {
        self.table = self
            .read_rows()
            .map_err(|source| database_error(&self.path, "read preferences", source))?;
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
        self.write_rows()
            .map_err(|source| database_error(&self.path, "write preferences", source))?;
        info!("wrote preference table to {}", self.path);
        Ok(())
    }
}

fn database_error(
    path: &Utf8Path,
    operation: &'static str,
    source: rusqlite::Error,
) -> PreferenceStoreError {
    PreferenceStoreError::Database {
        path: path.to_path_buf(),
        operation,
        source,
    }
}
