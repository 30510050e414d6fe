//! The read-only car catalog.
//!
//! Catalog order is significant: ranking ties are broken by the position of a
//! car in the catalog.

use std::collections::HashSet;
use std::io::Read;

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::Car;

/// Errors raised while loading a catalog.
///
/// A catalog is required to produce any recommendation, so every variant is
/// fatal for the caller.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be opened or read.
    #[error("failed to read catalog at {path}")]
    Open {
        /// Requested catalog path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// The catalog JSON was malformed.
    #[error("failed to parse catalog JSON")]
    Parse {
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// The catalog file was read but its JSON was malformed.
    #[error("failed to parse catalog JSON at {path}")]
    ParseFile {
        /// Catalog path that held the malformed JSON.
        path: Utf8PathBuf,
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// Two cars shared a name.
    #[error("catalog lists car '{name}' more than once")]
    DuplicateName {
        /// The repeated name.
        name: String,
    },
}

/// Ordered, immutable list of cars.
///
/// # Examples
/// ```
/// use carmatch_core::Catalog;
///
/// # fn main() -> Result<(), carmatch_core::CatalogError> {
/// let catalog = Catalog::from_json_str(
///     r#"[{"name":"Alto","price":5,"fuel":"Petrol","transmission":"Manual","space":"Small","usage":"City"}]"#,
/// )?;
/// assert_eq!(catalog.len(), 1);
/// assert!(catalog.get("Alto").is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    cars: Vec<Car>,
}

impl Catalog {
    /// Validate and construct a catalog.
    ///
    /// # Errors
    /// Returns [`CatalogError::DuplicateName`] when two cars share a name.
    pub fn new(cars: Vec<Car>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(cars.len());
        for car in &cars {
            if !seen.insert(car.name.as_str()) {
                return Err(CatalogError::DuplicateName {
                    name: car.name.clone(),
                });
            }
        }
        Ok(Self { cars })
    }

    /// Parse a JSON array of car records.
    ///
    /// # Errors
    /// Returns [`CatalogError::Parse`] for malformed JSON and
    /// [`CatalogError::DuplicateName`] for repeated names.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let cars: Vec<Car> =
            serde_json::from_str(json).map_err(|source| CatalogError::Parse { source })?;
        Self::new(cars)
    }

    /// Parse a JSON array of car records from a reader.
    ///
    /// # Errors
    /// As [`Catalog::from_json_str`].
    pub fn from_json_reader(reader: impl Read) -> Result<Self, CatalogError> {
        let cars: Vec<Car> =
            serde_json::from_reader(reader).map_err(|source| CatalogError::Parse { source })?;
        Self::new(cars)
    }

    /// Look up a car by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Car> {
        self.cars.iter().find(|car| car.name == name)
    }

    /// Iterate over cars in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, Car> {
        self.cars.iter()
    }

    /// Number of cars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cars.len()
    }

    /// Report whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Car;
    type IntoIter = std::slice::Iter<'a, Car>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Load a catalog from a JSON file.
///
/// # Errors
/// Returns [`CatalogError::Open`] when the file is missing or unreadable,
/// [`CatalogError::ParseFile`] when its JSON is malformed and
/// [`CatalogError::DuplicateName`] when a name repeats.
#[cfg(feature = "store-json")]
pub fn load_catalog(path: &camino::Utf8Path) -> Result<Catalog, CatalogError> {
    let file = carmatch_fs::open_utf8_file(path).map_err(|source| CatalogError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let cars: Vec<Car> = serde_json::from_reader(std::io::BufReader::new(file)).map_err(
        |source| CatalogError::ParseFile {
            path: path.to_path_buf(),
            source,
        },
    )?;
    let catalog = Catalog::new(cars)?;
    log::info!("loaded {} cars from {path}", catalog.len());
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn rejects_duplicate_names() {
        let cars = vec![
            Car::new("Alto", 5.0, "Petrol", "Manual", "Small", "City"),
            Car::new("Alto", 6.0, "CNG", "Manual", "Small", "City"),
        ];
        let err = Catalog::new(cars).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateName { name } if name == "Alto"));
    }

    #[rstest]
    #[case("not json")]
    #[case(r#"{"name":"Alto"}"#)]
    #[case(r#"[{"name":"Alto","price":"cheap"}]"#)]
    fn malformed_json_is_a_parse_error(#[case] json: &str) {
        let err = Catalog::from_json_str(json).unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }

    #[rstest]
    fn empty_array_is_an_empty_catalog() {
        let catalog = Catalog::from_json_str("[]").unwrap();
        assert!(catalog.is_empty());
    }

    #[cfg(feature = "store-json")]
    #[rstest]
    fn missing_file_is_an_open_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("carDB.json")).unwrap();
        let err = load_catalog(&path).unwrap_err();
        assert!(matches!(err, CatalogError::Open { .. }));
    }

    #[cfg(feature = "store-json")]
    #[rstest]
    fn malformed_file_names_its_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("carDB.json")).unwrap();
        std::fs::write(path.as_std_path(), b"[{\"name\":").unwrap();

        let err = load_catalog(&path).unwrap_err();
        match &err {
            CatalogError::ParseFile { path: reported, .. } => assert_eq!(reported, &path),
            other => panic!("expected ParseFile, found {other:?}"),
        }
        assert!(err.to_string().contains(path.as_str()));
    }
}
