//! Matching and feedback for the carmatch recommender.
//!
//! The crate provides two complementary capabilities:
//! - **Rule-based ranking** with [`AttributeMatcher`], which counts how many
//!   persona answers a car satisfies (see [`RuleVariant`]) and adds the
//!   persona's learned adjustment from the preference table. It implements the
//!   [`Matcher`](carmatch_core::Matcher) trait.
//! - **Feedback** with [`FeedbackUpdater`], which turns a 1–5 [`Rating`] into
//!   a reward and moves the stored adjustment toward it by an exponential
//!   moving average. [`Session`] ties both together for interactive use.
//!
//! # Examples
//!
//! ```
//! use carmatch_core::{Car, Catalog, Matcher, MemoryPreferenceStore, Persona, PreferenceStore};
//! use carmatch_scorer::{AttributeMatcher, FeedbackUpdater, Rating};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Catalog::new(vec![Car::new("Alto", 5.0, "Petrol", "Manual", "Small", "City")])?;
//! let persona = Persona::new("6", "Petrol", "Manual", "Small", "City")?;
//! let mut store = MemoryPreferenceStore::default();
//!
//! let ranking = AttributeMatcher::new().rank(&persona, &catalog, store.table())?;
//! FeedbackUpdater::default().rate_top(&mut store, &persona, &ranking, Rating::new(5)?)?;
//!
//! let ranking = AttributeMatcher::new().rank(&persona, &catalog, store.table())?;
//! assert_eq!(ranking.top().map(|car| car.total), Some(5.1));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod feedback;
mod matcher;
mod rules;
mod session;

pub use feedback::{
    FeedbackError, FeedbackOutcome, FeedbackUpdater, LearningRate, LearningRateError, Rating,
    RatingError, Reward,
};
pub use matcher::{AttributeMatcher, parse_budget};
pub use rules::{RuleVariant, UnknownRuleVariant};
pub use session::{Session, SessionError, SessionState};
