//! Rule-based matcher blended with learned adjustments.

use carmatch_core::{Catalog, MatchError, Matcher, Persona, PreferenceTable, RankedCar, Ranking};
use log::debug;

use crate::rules::{RuleVariant, rule_score};

/// Ranks cars by attribute matches plus the persona's learned adjustment.
///
/// Each car earns one point per matched predicate (see [`RuleVariant`]) and
/// the stored preference for `(persona key, car)` is added on top.
///
/// # Examples
/// ```
/// use carmatch_core::{Car, Catalog, Matcher, Persona, PreferenceTable};
/// use carmatch_scorer::AttributeMatcher;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let catalog = Catalog::new(vec![Car::new("Alto", 5.0, "Petrol", "Manual", "Small", "City")])?;
/// let persona = Persona::new("6", "Petrol", "Manual", "Small", "City")?;
/// let ranking = AttributeMatcher::new().rank(&persona, &catalog, &PreferenceTable::new())?;
/// assert_eq!(ranking.top().map(|car| car.total), Some(5.0));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttributeMatcher {
    variant: RuleVariant,
}

impl AttributeMatcher {
    /// Matcher using the additive five-predicate rules.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_variant(RuleVariant::Additive)
    }

    /// Matcher using an explicitly chosen rule variant.
    #[must_use]
    pub const fn with_variant(variant: RuleVariant) -> Self {
        Self { variant }
    }

    /// The active rule variant.
    #[must_use]
    pub const fn variant(&self) -> RuleVariant {
        self.variant
    }
}

impl Matcher for AttributeMatcher {
    fn rank(
        &self,
        persona: &Persona,
        catalog: &Catalog,
        table: &PreferenceTable,
    ) -> Result<Ranking, MatchError> {
        let budget = parse_budget(persona.budget())?;
        let key = persona.key();
        let scored = catalog
            .iter()
            .map(|car| {
                RankedCar::new(
                    &car.name,
                    rule_score(self.variant, persona, budget, car),
                    table.adjustment(&key, &car.name),
                )
            })
            .collect();
        let ranking = Ranking::from_scored(scored);
        debug!(
            "ranked {} cars for persona {key} using {} rules; top: {:?}",
            catalog.len(),
            self.variant,
            ranking.top().map(|car| car.name.as_str())
        );
        Ok(ranking)
    }
}

/// Parse a budget answer, rejecting text that is not a finite number.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
/// Returns [`MatchError::InvalidBudget`] carrying the original text.
pub fn parse_budget(raw: &str) -> Result<f64, MatchError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|budget| budget.is_finite())
        .ok_or_else(|| MatchError::InvalidBudget {
            raw: raw.to_owned(),
        })
}
