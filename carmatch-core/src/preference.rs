//! Learned per-persona adjustments.
//!
//! The table maps a [`PersonaKey`] to per-car adjustment scores. Sorted maps
//! keep the persisted form deterministic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::PersonaKey;

/// Two-level mapping of persona key → car name → adjustment.
///
/// Serialises to the JSON object `{ "<key>": { "<car>": <float> } }`.
///
/// # Examples
/// ```
/// use carmatch_core::{PersonaKey, PreferenceTable};
///
/// let key = PersonaKey::from_raw("abc");
/// let mut table = PreferenceTable::new();
/// assert_eq!(table.adjustment(&key, "Alto"), 0.0);
/// table.set(key.clone(), "Alto", 0.1);
/// assert_eq!(table.get(&key, "Alto"), Some(0.1));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferenceTable {
    rows: BTreeMap<PersonaKey, BTreeMap<String, f64>>,
}

impl PreferenceTable {
    /// Construct an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the stored value for `(key, car)`, if one has been written.
    #[must_use]
    pub fn get(&self, key: &PersonaKey, car: &str) -> Option<f64> {
        self.rows.get(key).and_then(|row| row.get(car)).copied()
    }

    /// Return the adjustment for `(key, car)`, defaulting to `0.0`.
    #[must_use]
    pub fn adjustment(&self, key: &PersonaKey, car: &str) -> f64 {
        self.get(key, car).unwrap_or(0.0)
    }

    /// Insert or overwrite the value for `(key, car)`.
    pub fn set(&mut self, key: PersonaKey, car: impl Into<String>, value: f64) {
        self.rows.entry(key).or_default().insert(car.into(), value);
    }

    /// Number of persona rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Report whether no persona has been rated yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over every `(key, car, value)` entry in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&PersonaKey, &str, f64)> {
        self.rows.iter().flat_map(|(key, row)| {
            row.iter()
                .map(move |(car, value)| (key, car.as_str(), *value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn integer_values_from_older_files_load_as_floats() {
        let json = r#"{"k1":{"Alto":0,"Swift":0.1}}"#;
        let table: PreferenceTable = serde_json::from_str(json).unwrap();
        let key = PersonaKey::from_raw("k1");
        assert_eq!(table.get(&key, "Alto"), Some(0.0));
        assert_eq!(table.get(&key, "Swift"), Some(0.1));
    }

    #[rstest]
    fn serialises_as_nested_object() {
        let mut table = PreferenceTable::new();
        table.set(PersonaKey::from_raw("k1"), "Alto", -0.1);
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"k1":{"Alto":-0.1}}"#);
    }

    #[rstest]
    fn entries_flatten_rows() {
        let mut table = PreferenceTable::new();
        table.set(PersonaKey::from_raw("b"), "Swift", 0.2);
        table.set(PersonaKey::from_raw("a"), "Alto", 0.1);
        let keys: Vec<_> = table.entries().map(|(key, car, _)| (key.as_str(), car)).collect();
        assert_eq!(keys, vec![("a", "Alto"), ("b", "Swift")]);
    }
}
