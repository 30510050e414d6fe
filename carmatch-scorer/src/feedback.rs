//! Feedback: nudge stored preferences toward the user's verdict.
//!
//! A [`Rating`] on the 1–5 scale becomes a [`Reward`] of +1 (3 and above) or
//! −1, and the stored value for `(persona key, car)` moves a fraction of the
//! way toward it:
//!
//! ```text
//! new = old + learning_rate * (reward - old)
//! ```
//!
//! With a learning rate in `(0, 1]` repeated identical rewards converge on the
//! reward without overshooting it.

use carmatch_core::{PersonaKey, Persona, PreferenceStore, PreferenceStoreError, Ranking};
use log::{info, warn};
use serde::Serialize;
use thiserror::Error;

/// A user rating on the inclusive 1–5 scale.
///
/// # Examples
/// ```
/// use carmatch_scorer::{Rating, Reward};
///
/// # fn main() -> Result<(), carmatch_scorer::RatingError> {
/// assert_eq!(Reward::from(Rating::new(3)?), Reward::Positive);
/// assert_eq!(Reward::from(Rating::new(2)?), Reward::Negative);
/// assert!(Rating::new(6).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    /// Lowest accepted rating.
    pub const MIN: u8 = 1;
    /// Highest accepted rating.
    pub const MAX: u8 = 5;
    /// Ratings at or above this value count as acceptable.
    pub const MIDPOINT: u8 = 3;

    /// Validate a rating.
    ///
    /// # Errors
    /// Returns [`RatingError::OutOfRange`] outside `1..=5`.
    pub const fn new(value: u8) -> Result<Self, RatingError> {
        if value < Self::MIN || value > Self::MAX {
            return Err(RatingError::OutOfRange { value });
        }
        Ok(Self(value))
    }

    /// The raw rating.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Errors returned by [`Rating::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RatingError {
    /// The rating fell outside `1..=5`.
    #[error("rating {value} is outside 1..=5")]
    OutOfRange {
        /// The rejected rating.
        value: u8,
    },
}

/// Reward signal derived from a rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Reward {
    /// Rating of 3 or more.
    Positive,
    /// Rating below 3.
    Negative,
}

impl Reward {
    /// Numeric target: `1.0` or `-1.0`.
    #[must_use]
    pub const fn value(self) -> f64 {
        match self {
            Self::Positive => 1.0,
            Self::Negative => -1.0,
        }
    }
}

impl From<Rating> for Reward {
    fn from(rating: Rating) -> Self {
        if rating.get() >= Rating::MIDPOINT {
            Self::Positive
        } else {
            Self::Negative
        }
    }
}

/// Step size for the moving-average update, in `(0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct LearningRate(f64);

impl LearningRate {
    /// Rate used when none is configured.
    pub const DEFAULT: Self = Self(0.1);

    /// Validate a learning rate.
    ///
    /// # Errors
    /// Returns [`LearningRateError::OutOfRange`] unless `0 < value <= 1`.
    pub fn new(value: f64) -> Result<Self, LearningRateError> {
        if value > 0.0 && value <= 1.0 {
            Ok(Self(value))
        } else {
            Err(LearningRateError::OutOfRange { value })
        }
    }

    /// The raw rate.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl Default for LearningRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Errors returned by [`LearningRate::new`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LearningRateError {
    /// The rate was not in `(0, 1]` (NaN included).
    #[error("learning rate {value} must be greater than 0 and at most 1")]
    OutOfRange {
        /// The rejected rate.
        value: f64,
    },
}

/// Result of applying one rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackOutcome {
    /// Persona whose row was updated.
    pub key: PersonaKey,
    /// Car that received the credit.
    pub car: String,
    /// The rating supplied by the user.
    pub rating: Rating,
    /// Reward derived from the rating.
    pub reward: Reward,
    /// Stored value before the update (`0.0` when absent).
    pub previous: f64,
    /// Stored value after the update.
    pub value: f64,
}

/// Errors raised while applying feedback.
#[derive(Debug, Error)]
pub enum FeedbackError {
    /// There was no ranked car to credit.
    #[error("cannot apply feedback: the ranking is empty")]
    EmptyRanking,
    /// The update was applied in memory but could not be persisted.
    #[error("feedback for '{}' was applied but not persisted", outcome.car)]
    Persist {
        /// The in-memory update that was kept.
        outcome: Box<FeedbackOutcome>,
        /// Source error from the store.
        #[source]
        source: PreferenceStoreError,
    },
}

/// Applies ratings to a [`PreferenceStore`].
///
/// # Examples
/// ```
/// use carmatch_core::{MemoryPreferenceStore, PersonaKey, PreferenceStore};
/// use carmatch_scorer::{FeedbackUpdater, Rating};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = MemoryPreferenceStore::default();
/// let key = PersonaKey::from_raw("k");
/// let outcome = FeedbackUpdater::default().apply(&mut store, &key, "Alto", Rating::new(5)?)?;
/// assert_eq!(outcome.value, 0.1);
/// assert_eq!(store.get(&key, "Alto"), Some(0.1));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FeedbackUpdater {
    rate: LearningRate,
}

impl FeedbackUpdater {
    /// Updater with an explicit learning rate.
    #[must_use]
    pub const fn new(rate: LearningRate) -> Self {
        Self { rate }
    }

    /// The configured learning rate.
    #[must_use]
    pub const fn learning_rate(&self) -> LearningRate {
        self.rate
    }

    /// Move `previous` one step toward `reward`.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "the moving-average update is floating-point by definition"
    )]
    pub fn step(&self, previous: f64, reward: Reward) -> f64 {
        previous + self.rate.get() * (reward.value() - previous)
    }

    /// Apply `rating` to the `(key, car)` entry and persist the table.
    ///
    /// # Errors
    /// Returns [`FeedbackError::Persist`] when the store cannot flush; the
    /// in-memory update is kept and reported in the error.
    pub fn apply<S>(
        &self,
        store: &mut S,
        key: &PersonaKey,
        car: &str,
        rating: Rating,
    ) -> Result<FeedbackOutcome, FeedbackError>
    where
        S: PreferenceStore + ?Sized,
    {
        let reward = Reward::from(rating);
        let previous = store.get(key, car).unwrap_or(0.0);
        let value = self.step(previous, reward);
        store.put(key.clone(), car, value);

        let outcome = FeedbackOutcome {
            key: key.clone(),
            car: car.to_owned(),
            rating,
            reward,
            previous,
            value,
        };
        if let Err(source) = store.flush() {
            warn!("preference update for {car} kept in memory only: {source}");
            return Err(FeedbackError::Persist {
                outcome: Box::new(outcome),
                source,
            });
        }
        info!(
            "rating {} for {car} moved preference {previous} -> {value}",
            rating.get()
        );
        Ok(outcome)
    }

    /// Credit the top-ranked car of `ranking` for `persona`.
    ///
    /// # Errors
    /// Returns [`FeedbackError::EmptyRanking`] when nothing was ranked and the
    /// errors of [`FeedbackUpdater::apply`] otherwise.
    pub fn rate_top<S>(
        &self,
        store: &mut S,
        persona: &Persona,
        ranking: &Ranking,
        rating: Rating,
    ) -> Result<FeedbackOutcome, FeedbackError>
    where
        S: PreferenceStore + ?Sized,
    {
        let top = ranking.top().ok_or(FeedbackError::EmptyRanking)?;
        self.apply(store, &persona.key(), &top.name, rating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carmatch_core::test_support::{FailingFlushStore, city_persona};
    use carmatch_core::{MemoryPreferenceStore, RankedCar};
    use rstest::{fixture, rstest};

    #[fixture]
    fn key() -> PersonaKey {
        city_persona("6").key()
    }

    #[rstest]
    #[case(0)]
    #[case(6)]
    fn ratings_outside_scale_are_rejected(#[case] value: u8) {
        assert_eq!(Rating::new(value), Err(RatingError::OutOfRange { value }));
    }

    #[rstest]
    #[case(1, Reward::Negative)]
    #[case(2, Reward::Negative)]
    #[case(3, Reward::Positive)]
    #[case(4, Reward::Positive)]
    #[case(5, Reward::Positive)]
    fn midpoint_counts_as_positive(#[case] value: u8, #[case] expected: Reward) {
        assert_eq!(Reward::from(Rating::new(value).unwrap()), expected);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-0.1)]
    #[case(1.5)]
    #[case(f64::NAN)]
    fn learning_rate_must_be_in_unit_interval(#[case] value: f64) {
        assert!(LearningRate::new(value).is_err());
    }

    #[rstest]
    fn learning_rate_of_one_jumps_to_reward() {
        let updater = FeedbackUpdater::new(LearningRate::new(1.0).unwrap());
        assert_eq!(updater.step(0.3, Reward::Negative), -1.0);
    }

    #[rstest]
    fn positive_rating_on_fresh_entry(key: PersonaKey) {
        let mut store = MemoryPreferenceStore::default();
        let outcome = FeedbackUpdater::default()
            .apply(&mut store, &key, "Alto", Rating::new(5).unwrap())
            .unwrap();
        assert_eq!(outcome.previous, 0.0);
        assert_eq!(outcome.value, 0.1);
        assert_eq!(store.get(&key, "Alto"), Some(0.1));
        assert_eq!(store.flush_count(), 1);
    }

    #[rstest]
    fn negative_rating_on_fresh_entry(key: PersonaKey) {
        let mut store = MemoryPreferenceStore::default();
        let outcome = FeedbackUpdater::default()
            .apply(&mut store, &key, "Alto", Rating::new(1).unwrap())
            .unwrap();
        assert_eq!(outcome.reward, Reward::Negative);
        assert_eq!(outcome.value, -0.1);
    }

    #[rstest]
    fn second_positive_rating_builds_on_the_first(key: PersonaKey) {
        let mut store = MemoryPreferenceStore::default();
        let updater = FeedbackUpdater::default();
        let five = Rating::new(5).unwrap();
        updater.apply(&mut store, &key, "Alto", five).unwrap();
        let outcome = updater.apply(&mut store, &key, "Alto", five).unwrap();
        assert_eq!(outcome.previous, 0.1);
        assert_eq!(outcome.value, 0.19);
    }

    #[rstest]
    fn failed_flush_keeps_in_memory_update(key: PersonaKey) {
        let mut store = FailingFlushStore::default();
        let err = FeedbackUpdater::default()
            .apply(&mut store, &key, "Alto", Rating::new(4).unwrap())
            .unwrap_err();
        match err {
            FeedbackError::Persist { outcome, .. } => assert_eq!(outcome.value, 0.1),
            other => panic!("expected Persist, found {other:?}"),
        }
        assert_eq!(store.get(&key, "Alto"), Some(0.1));
    }

    #[rstest]
    fn rate_top_credits_first_ranked_car() {
        let persona = city_persona("6");
        let ranking = Ranking::from_scored(vec![
            RankedCar::new("Swift", 3, 0.0),
            RankedCar::new("Alto", 5, 0.0),
        ]);
        let mut store = MemoryPreferenceStore::default();
        let outcome = FeedbackUpdater::default()
            .rate_top(&mut store, &persona, &ranking, Rating::new(3).unwrap())
            .unwrap();
        assert_eq!(outcome.car, "Alto");
        assert_eq!(store.get(&persona.key(), "Swift"), None);
    }

    #[rstest]
    fn rate_top_rejects_empty_ranking() {
        let mut store = MemoryPreferenceStore::default();
        let err = FeedbackUpdater::default()
            .rate_top(
                &mut store,
                &city_persona("6"),
                &Ranking::default(),
                Rating::new(5).unwrap(),
            )
            .unwrap_err();
        assert!(matches!(err, FeedbackError::EmptyRanking));
        assert_eq!(store.flush_count(), 0);
    }
}
