//! Facade crate for the carmatch car recommender.
//!
//! This crate re-exports the core domain types and exposes the matcher,
//! feedback updater and preference store backends behind feature flags.

#![forbid(unsafe_code)]

pub use carmatch_core::{
    Car, Catalog, CatalogError, MatchError, Matcher, MemoryPreferenceStore, Persona,
    PersonaDraft, PersonaError, PersonaField, PersonaKey, PreferenceStore, PreferenceStoreError,
    PreferenceTable, RECOMMENDATION_LIMIT, RECOMMENDATION_THRESHOLD, RankedCar, Ranking,
};

#[cfg(feature = "store-json")]
pub use carmatch_core::{JsonPreferenceStore, load_catalog};

#[cfg(feature = "store-sqlite")]
pub use carmatch_core::SqlitePreferenceStore;

#[cfg(feature = "scorer")]
pub use carmatch_scorer::{
    AttributeMatcher, FeedbackError, FeedbackOutcome, FeedbackUpdater, LearningRate,
    LearningRateError, Rating, RatingError, Reward, RuleVariant, Session, SessionError,
    SessionState,
};
