//! Test-only fixtures: a small catalog and a store whose flush always fails.

use std::io;

use camino::Utf8PathBuf;

use crate::{
    Car, Catalog, MemoryPreferenceStore, Persona, PersonaKey, PreferenceStore,
    PreferenceStoreError, PreferenceTable,
};

/// The single-car catalog used by the reference scenarios.
#[must_use]
pub fn alto() -> Car {
    Car::new("Alto", 5.0, "Petrol", "Manual", "Small", "City")
}

/// A five-car catalog covering every fuel type.
#[must_use]
pub fn sample_cars() -> Vec<Car> {
    vec![
        alto(),
        Car::new("Swift", 7.0, "Petrol/CNG", "Manual/Automatic", "Small", "City/Highway"),
        Car::new("Nexon EV", 15.0, "Electric", "Automatic", "Medium", "City"),
        Car::new("Innova Hycross", 20.0, "Hybrid", "Automatic", "Large seating", "Highway"),
        Car::new("Thar", 12.0, "Diesel", "Manual", "Medium boot", "Off-roading"),
    ]
}

/// [`sample_cars`] wrapped in a [`Catalog`].
///
/// # Panics
/// Never: the sample names are unique.
#[must_use]
#[expect(clippy::expect_used, reason = "fixture names are unique by construction")]
pub fn sample_catalog() -> Catalog {
    Catalog::new(sample_cars()).expect("sample catalog names are unique")
}

/// A complete persona that matches [`alto`] on every attribute.
///
/// # Panics
/// Never: every answer is non-empty.
#[must_use]
#[expect(clippy::expect_used, reason = "fixture answers are non-empty")]
pub fn city_persona(budget: &str) -> Persona {
    Persona::new(budget, "Petrol", "Manual", "Small", "City").expect("fixture persona is complete")
}

/// In-memory store whose flush always reports a write failure.
#[derive(Debug, Default)]
pub struct FailingFlushStore {
    inner: MemoryPreferenceStore,
}

impl PreferenceStore for FailingFlushStore {
    fn load(&mut self) -> Result<(), PreferenceStoreError> {
        self.inner.load()
    }

    fn table(&self) -> &PreferenceTable {
        self.inner.table()
    }

    fn put(&mut self, key: PersonaKey, car: &str, value: f64) {
        self.inner.put(key, car, value);
    }

    fn flush(&mut self) -> Result<(), PreferenceStoreError> {
        Err(PreferenceStoreError::Write {
            path: Utf8PathBuf::from("unavailable/qTable.json"),
            source: io::Error::other("storage unavailable"),
        })
    }
}
