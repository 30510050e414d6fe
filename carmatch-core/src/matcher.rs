//! Rank catalog entries for a persona.
//!
//! The `Matcher` trait turns a complete [`Persona`](crate::Persona), the
//! [`Catalog`](crate::Catalog) and the learned
//! [`PreferenceTable`](crate::PreferenceTable) into a [`Ranking`].

use thiserror::Error;

use crate::{Catalog, Persona, PreferenceTable, Ranking};

/// Errors returned by [`Matcher::rank`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// The persona budget is not a finite number.
    #[error("budget '{raw}' is not a number")]
    InvalidBudget {
        /// Budget text as entered.
        raw: String,
    },
}

/// Rank a catalog against a persona.
///
/// Implementations must not mutate the preference table, must return at most
/// [`RECOMMENDATION_LIMIT`](crate::RECOMMENDATION_LIMIT) cars best-first, and
/// must keep catalog order among equal totals. Invalid input is reported as a
/// [`MatchError`] rather than scored as a mismatch.
///
/// # Examples
///
/// ```rust
/// use carmatch_core::{
///     Catalog, MatchError, Matcher, Persona, PreferenceTable, RankedCar, Ranking,
/// };
///
/// struct NameOrder;
///
/// impl Matcher for NameOrder {
///     fn rank(
///         &self,
///         persona: &Persona,
///         catalog: &Catalog,
///         table: &PreferenceTable,
///     ) -> Result<Ranking, MatchError> {
///         let key = persona.key();
///         Ok(Ranking::from_scored(
///             catalog
///                 .iter()
///                 .map(|car| RankedCar::new(&car.name, 0, table.adjustment(&key, &car.name)))
///                 .collect(),
///         ))
///     }
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let persona = Persona::new("6", "Petrol", "Manual", "Small", "City")?;
/// let ranking = NameOrder.rank(&persona, &Catalog::default(), &PreferenceTable::new())?;
/// assert!(ranking.is_empty());
/// # Ok(())
/// # }
/// ```
pub trait Matcher {
    /// Score every car and return the best-ranked entries.
    ///
    /// # Errors
    /// Returns [`MatchError::InvalidBudget`] when the budget cannot be parsed.
    fn rank(
        &self,
        persona: &Persona,
        catalog: &Catalog,
        table: &PreferenceTable,
    ) -> Result<Ranking, MatchError>;
}
