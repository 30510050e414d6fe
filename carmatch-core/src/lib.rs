//! Core domain types for the carmatch recommender.
//!
//! A [`Persona`] captures five answers (budget, fuel, transmission, space,
//! usage). A [`Matcher`] ranks the read-only [`Catalog`] against it, adding
//! learned per-persona adjustments from a [`PreferenceTable`]. The table lives
//! behind a [`PreferenceStore`] so tests can use memory while the CLI persists
//! to JSON or SQLite.
//!
//! Constructors validate their input and return `Result` so invalid personas
//! or catalogs never reach the matcher.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod car;
mod catalog;
mod matcher;
mod persona;
mod preference;
mod ranking;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use car::Car;
#[cfg(feature = "store-json")]
pub use catalog::load_catalog;
pub use catalog::{Catalog, CatalogError};
pub use matcher::{MatchError, Matcher};
pub use persona::{Persona, PersonaDraft, PersonaError, PersonaField, PersonaKey};
pub use preference::PreferenceTable;
pub use ranking::{RECOMMENDATION_LIMIT, RECOMMENDATION_THRESHOLD, RankedCar, Ranking};
#[cfg(feature = "store-json")]
pub use store::JsonPreferenceStore;
#[cfg(feature = "store-sqlite")]
pub use store::SqlitePreferenceStore;
pub use store::{MemoryPreferenceStore, PreferenceStore, PreferenceStoreError};
