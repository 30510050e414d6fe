//! Conversation state for collecting a persona, scoring it and rating the
//! result.
//!
//! The session moves through four states:
//!
//! ```text
//! Collecting --all answered--> Ready --score--> Scored --rate--> Rated
//!      ^                        ^  |               |               |
//!      +------------------------+--+---answer------+---------------+
//! ```
//!
//! A new non-empty answer after the persona is complete drops any ranking and
//! returns to `Ready`. Empty answers are ignored. Scoring is allowed from
//! `Ready`, `Scored` and `Rated`; rating requires a ranking.

use carmatch_core::{
    Catalog, MatchError, Matcher, Persona, PersonaDraft, PersonaField, PreferenceStore,
    PreferenceTable, Ranking,
};
use log::debug;
use thiserror::Error;

use crate::feedback::{FeedbackError, FeedbackOutcome, FeedbackUpdater, Rating};

/// Where a [`Session`] currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Some persona fields are still unanswered.
    Collecting(PersonaDraft),
    /// Every field is answered; nothing has been scored yet.
    Ready(Persona),
    /// The persona has been ranked.
    Scored {
        /// Persona that was ranked.
        persona: Persona,
        /// The resulting ranking.
        ranking: Ranking,
    },
    /// The top-ranked car has been rated at least once.
    Rated {
        /// Persona that was ranked.
        persona: Persona,
        /// The ranking that was rated.
        ranking: Ranking,
        /// The most recent update.
        outcome: FeedbackOutcome,
    },
}

impl SessionState {
    /// Short lowercase name of the state.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Collecting(_) => "collecting",
            Self::Ready(_) => "ready",
            Self::Scored { .. } => "scored",
            Self::Rated { .. } => "rated",
        }
    }
}

/// Errors raised by [`Session`] transitions.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The requested action is not available in the current state.
    #[error("cannot {action} while the session is {state}")]
    InvalidTransition {
        /// Action that was attempted.
        action: &'static str,
        /// Name of the state at the time.
        state: &'static str,
    },
    /// Ranking the persona failed.
    #[error(transparent)]
    Match(#[from] MatchError),
    /// Applying the rating failed.
    #[error(transparent)]
    Feedback(#[from] FeedbackError),
}

/// Drives one user through answer, score and rate.
///
/// # Examples
/// ```
/// use carmatch_core::{Car, Catalog, MemoryPreferenceStore, PersonaField, PreferenceStore};
/// use carmatch_scorer::{AttributeMatcher, FeedbackUpdater, Rating, Session};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let catalog = Catalog::new(vec![Car::new("Alto", 5.0, "Petrol", "Manual", "Small", "City")])?;
/// let mut store = MemoryPreferenceStore::default();
/// let mut session = Session::new();
/// for (field, answer) in PersonaField::ALL.into_iter().zip(["6", "Petrol", "Manual", "Small", "City"]) {
///     session.answer(field, answer);
/// }
/// let ranking = session.score(&AttributeMatcher::new(), &catalog, store.table())?;
/// assert_eq!(ranking.top().map(|car| car.total), Some(5.0));
/// let outcome = session.rate(&FeedbackUpdater::default(), &mut store, Rating::new(5)?)?;
/// assert_eq!(outcome.value, 0.1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    state: SessionState,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            state: SessionState::Collecting(PersonaDraft::new()),
        }
    }
}

impl Session {
    /// Start collecting a new persona.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// The completed persona, once every field is answered.
    #[must_use]
    pub const fn persona(&self) -> Option<&Persona> {
        match &self.state {
            SessionState::Collecting(_) => None,
            SessionState::Ready(persona)
            | SessionState::Scored { persona, .. }
            | SessionState::Rated { persona, .. } => Some(persona),
        }
    }

    /// The latest ranking, if the persona has been scored.
    #[must_use]
    pub const fn ranking(&self) -> Option<&Ranking> {
        match &self.state {
            SessionState::Scored { ranking, .. } | SessionState::Rated { ranking, .. } => {
                Some(ranking)
            }
            SessionState::Collecting(_) | SessionState::Ready(_) => None,
        }
    }

    /// Fields still waiting for an answer, in prompt order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<PersonaField> {
        match &self.state {
            SessionState::Collecting(draft) => draft.missing(),
            _ => Vec::new(),
        }
    }

    /// Record an answer.
    ///
    /// Returns `false` when the answer was blank and nothing changed.
    pub fn answer(&mut self, field: PersonaField, value: impl Into<String>) -> bool {
        let mut draft = match &self.state {
            SessionState::Collecting(draft) => draft.clone(),
            SessionState::Ready(persona)
            | SessionState::Scored { persona, .. }
            | SessionState::Rated { persona, .. } => PersonaDraft::from(persona),
        };
        if !draft.set(field, value) {
            return false;
        }
        let next = draft
            .complete()
            .map_or(SessionState::Collecting(draft), SessionState::Ready);
        debug!(
            "session {} -> {} after answering {field}",
            self.state.name(),
            next.name()
        );
        self.state = next;
        true
    }

    /// Rank the completed persona.
    ///
    /// Rescoring discards any previous ranking and rating.
    ///
    /// # Errors
    /// Returns [`SessionError::InvalidTransition`] while answers are missing
    /// and [`SessionError::Match`] when the matcher rejects the persona; the
    /// state is unchanged in both cases.
    pub fn score<M>(
        &mut self,
        matcher: &M,
        catalog: &Catalog,
        table: &PreferenceTable,
    ) -> Result<&Ranking, SessionError>
    where
        M: Matcher + ?Sized,
    {
        let persona = self
            .persona()
            .cloned()
            .ok_or(SessionError::InvalidTransition {
                action: "score",
                state: self.state.name(),
            })?;
        let ranking = matcher.rank(&persona, catalog, table)?;
        self.state = SessionState::Scored { persona, ranking };
        self.ranking().ok_or(SessionError::InvalidTransition {
            action: "score",
            state: "scored",
        })
    }

    /// Rate the top-ranked car.
    ///
    /// A rating that was applied in memory but not persisted still moves the
    /// session to `Rated` before the error is returned.
    ///
    /// # Errors
    /// Returns [`SessionError::InvalidTransition`] before scoring and
    /// [`SessionError::Feedback`] when the update fails.
    pub fn rate<S>(
        &mut self,
        updater: &FeedbackUpdater,
        store: &mut S,
        rating: Rating,
    ) -> Result<&FeedbackOutcome, SessionError>
    where
        S: PreferenceStore + ?Sized,
    {
        let (persona, ranking) = match &self.state {
            SessionState::Scored { persona, ranking }
            | SessionState::Rated {
                persona, ranking, ..
            } => (persona.clone(), ranking.clone()),
            other => {
                return Err(SessionError::InvalidTransition {
                    action: "rate",
                    state: other.name(),
                });
            }
        };
        let (outcome, failure) = match updater.rate_top(store, &persona, &ranking, rating) {
            Ok(outcome) => (outcome, None),
            Err(FeedbackError::Persist { outcome, source }) => {
                let kept = (*outcome).clone();
                (kept, Some(FeedbackError::Persist { outcome, source }))
            }
            Err(err) => return Err(err.into()),
        };
        self.state = SessionState::Rated {
            persona,
            ranking,
            outcome,
        };
        if let Some(err) = failure {
            return Err(err.into());
        }
        match &self.state {
            SessionState::Rated { outcome, .. } => Ok(outcome),
            other => Err(SessionError::InvalidTransition {
                action: "rate",
                state: other.name(),
            }),
        }
    }
}
