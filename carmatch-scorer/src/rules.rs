//! Attribute predicates that make up the rule score.

use std::fmt;
use std::str::FromStr;

use carmatch_core::{Car, Persona, PersonaField};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which set of predicates contributes to the rule score.
///
/// # Examples
/// ```
/// use carmatch_scorer::RuleVariant;
///
/// assert_eq!(RuleVariant::default(), RuleVariant::Additive);
/// assert_eq!("legacy".parse::<RuleVariant>(), Ok(RuleVariant::Legacy));
/// assert_eq!(RuleVariant::Additive.max_score(), 5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleVariant {
    /// Budget, fuel, transmission, space and usage each add one point
    /// independently.
    #[default]
    Additive,
    /// Budget, fuel, transmission and usage only; a fuel mismatch discards
    /// the points accumulated so far, so transmission and usage can still
    /// score afterwards.
    Legacy,
}

impl RuleVariant {
    /// Lowercase name used in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Additive => "additive",
            Self::Legacy => "legacy",
        }
    }

    /// Highest rule score the variant can award.
    #[must_use]
    pub const fn max_score(self) -> u8 {
        match self {
            Self::Additive => 5,
            Self::Legacy => 4,
        }
    }
}

impl fmt::Display for RuleVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`RuleVariant`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown rule variant '{name}' (expected 'additive' or 'legacy')")]
pub struct UnknownRuleVariant {
    /// The rejected name.
    pub name: String,
}

impl FromStr for RuleVariant {
    type Err = UnknownRuleVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "additive" => Ok(Self::Additive),
            "legacy" => Ok(Self::Legacy),
            _ => Err(UnknownRuleVariant { name: s.to_owned() }),
        }
    }
}

/// Case-insensitive substring test of a persona answer against a car
/// attribute.
pub(crate) fn text_matches(persona: &Persona, car: &Car, field: PersonaField) -> bool {
    car.attribute(field).is_some_and(|attribute| {
        attribute
            .to_lowercase()
            .contains(&persona.get(field).to_lowercase())
    })
}

/// Count matched predicates for one car.
///
/// `budget` is the persona budget already parsed as a number.
pub(crate) fn rule_score(variant: RuleVariant, persona: &Persona, budget: f64, car: &Car) -> u8 {
    let affordable = budget >= car.price;
    let matches = |field| u8::from(text_matches(persona, car, field));
    match variant {
        RuleVariant::Additive => {
            u8::from(affordable)
                + matches(PersonaField::Fuel)
                + matches(PersonaField::Transmission)
                + matches(PersonaField::Space)
                + matches(PersonaField::Usage)
        }
        RuleVariant::Legacy => {
            let gated = if text_matches(persona, car, PersonaField::Fuel) {
                u8::from(affordable) + 1
            } else {
                0
            };
            gated + matches(PersonaField::Transmission) + matches(PersonaField::Usage)
        }
    }
}
