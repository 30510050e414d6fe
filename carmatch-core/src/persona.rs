//! Personas: the five self-reported preferences that drive matching.
//!
//! A [`Persona`] is always complete; partially answered questionnaires live in
//! a [`PersonaDraft`] until every field holds a non-empty answer. Values are
//! stored verbatim, including the budget, which is only parsed when a matcher
//! compares it against car prices.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// One of the five persona questions, in canonical order.
///
/// # Examples
/// ```
/// use carmatch_core::PersonaField;
///
/// assert_eq!(PersonaField::Transmission.as_str(), "transmission");
/// assert_eq!("Fuel".parse::<PersonaField>(), Ok(PersonaField::Fuel));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PersonaField {
    /// Maximum price the user will pay.
    Budget,
    /// Preferred fuel type.
    Fuel,
    /// Automatic or manual.
    Transmission,
    /// Seating or boot space needs.
    Space,
    /// Typical driving conditions.
    Usage,
}

impl PersonaField {
    /// All fields in the order used for prompting and key derivation.
    pub const ALL: [Self; 5] = [
        Self::Budget,
        Self::Fuel,
        Self::Transmission,
        Self::Space,
        Self::Usage,
    ];

    /// Return the field as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Budget => "budget",
            Self::Fuel => "fuel",
            Self::Transmission => "transmission",
            Self::Space => "space",
            Self::Usage => "usage",
        }
    }

    /// Question shown to the user when collecting this field.
    #[must_use]
    pub const fn prompt(self) -> &'static str {
        match self {
            Self::Budget => "What is your budget? (in INR Lakhs)",
            Self::Fuel => "Preferred fuel type? (Petrol/Diesel/Electric/Hybrid)",
            Self::Transmission => "Automatic or Manual?",
            Self::Space => "Do you need more seating or boot space?",
            Self::Usage => "City, Highway, or Off-roading?",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Budget => 0,
            Self::Fuel => 1,
            Self::Transmission => 2,
            Self::Space => 3,
            Self::Usage => 4,
        }
    }
}

impl fmt::Display for PersonaField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PersonaField {
    type Err = PersonaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PersonaError::UnknownField {
                name: s.to_owned(),
            })
    }
}

/// Errors raised while building personas.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersonaError {
    /// A required answer was empty or whitespace.
    #[error("persona field `{field}` must not be empty")]
    MissingField {
        /// The unanswered field.
        field: PersonaField,
    },
    /// A field name did not match any persona question.
    #[error("unknown persona field '{name}'")]
    UnknownField {
        /// The unrecognised name.
        name: String,
    },
}

/// A complete set of user preferences.
///
/// # Examples
/// ```
/// use carmatch_core::Persona;
///
/// # fn main() -> Result<(), carmatch_core::PersonaError> {
/// let persona = Persona::new("6", "Petrol", "Manual", "Small", "City")?;
/// assert_eq!(persona.budget(), "6");
/// assert!(Persona::new("", "Petrol", "Manual", "Small", "City").is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPersona", into = "RawPersona")]
pub struct Persona {
    values: [String; 5],
}

impl Persona {
    /// Validate and construct a persona from raw answers.
    ///
    /// # Errors
    /// Returns [`PersonaError::MissingField`] for the first empty answer in
    /// canonical field order.
    pub fn new(
        budget: impl Into<String>,
        fuel: impl Into<String>,
        transmission: impl Into<String>,
        space: impl Into<String>,
        usage: impl Into<String>,
    ) -> Result<Self, PersonaError> {
        let values = [
            budget.into(),
            fuel.into(),
            transmission.into(),
            space.into(),
            usage.into(),
        ];
        for field in PersonaField::ALL {
            if values
                .get(field.index())
                .is_none_or(|value| value.trim().is_empty())
            {
                return Err(PersonaError::MissingField { field });
            }
        }
        Ok(Self { values })
    }

    /// Return the raw answer for `field`.
    #[must_use]
    pub fn get(&self, field: PersonaField) -> &str {
        self.values.get(field.index()).map_or("", String::as_str)
    }

    /// Raw budget text as entered.
    #[must_use]
    pub fn budget(&self) -> &str {
        self.get(PersonaField::Budget)
    }

    /// Derive the stable preference-table key for this persona.
    #[must_use]
    pub fn key(&self) -> PersonaKey {
        PersonaKey::from_persona(self)
    }

    /// Return a copy with one answer replaced.
    ///
    /// # Errors
    /// Returns [`PersonaError::MissingField`] when `value` is empty.
    pub fn with_answer(
        &self,
        field: PersonaField,
        value: impl Into<String>,
    ) -> Result<Self, PersonaError> {
        let answer = value.into();
        if answer.trim().is_empty() {
            return Err(PersonaError::MissingField { field });
        }
        let mut values = self.values.clone();
        if let Some(slot) = values.get_mut(field.index()) {
            *slot = answer;
        }
        Ok(Self { values })
    }
}

#[derive(Serialize, Deserialize)]
struct RawPersona {
    budget: String,
    fuel: String,
    transmission: String,
    space: String,
    usage: String,
}

impl TryFrom<RawPersona> for Persona {
    type Error = PersonaError;

    fn try_from(raw: RawPersona) -> Result<Self, Self::Error> {
        Self::new(raw.budget, raw.fuel, raw.transmission, raw.space, raw.usage)
    }
}

impl From<Persona> for RawPersona {
    fn from(persona: Persona) -> Self {
        let [budget, fuel, transmission, space, usage] = persona.values;
        Self {
            budget,
            fuel,
            transmission,
            space,
            usage,
        }
    }
}

/// A partially answered questionnaire.
///
/// Empty answers are ignored so a blank submission never erases an earlier
/// answer.
///
/// # Examples
/// ```
/// use carmatch_core::{PersonaDraft, PersonaField};
///
/// let mut draft = PersonaDraft::new();
/// draft.set(PersonaField::Budget, "6");
/// draft.set(PersonaField::Fuel, "   ");
/// assert_eq!(draft.missing().first(), Some(&PersonaField::Fuel));
/// assert!(draft.complete().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonaDraft {
    values: [Option<String>; 5],
}

impl PersonaDraft {
    /// Construct an empty draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer; returns `false` when the answer was empty and ignored.
    pub fn set(&mut self, field: PersonaField, value: impl Into<String>) -> bool {
        let answer = value.into();
        if answer.trim().is_empty() {
            return false;
        }
        if let Some(slot) = self.values.get_mut(field.index()) {
            *slot = Some(answer);
        }
        true
    }

    /// Return the recorded answer for `field`, if any.
    #[must_use]
    pub fn get(&self, field: PersonaField) -> Option<&str> {
        self.values
            .get(field.index())
            .and_then(|value| value.as_deref())
    }

    /// Unanswered fields in canonical order.
    #[must_use]
    pub fn missing(&self) -> Vec<PersonaField> {
        PersonaField::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_none())
            .collect()
    }

    /// Build a [`Persona`] once every field is answered.
    #[must_use]
    pub fn complete(&self) -> Option<Persona> {
        let [budget, fuel, transmission, space, usage] = self.values.clone();
        Persona::new(budget?, fuel?, transmission?, space?, usage?).ok()
    }
}

impl From<&Persona> for PersonaDraft {
    fn from(persona: &Persona) -> Self {
        Self {
            values: persona.values.clone().map(Some),
        }
    }
}

/// Stable identifier for a persona in the preference table.
///
/// The key is the lowercase hex SHA-256 digest of the raw answers joined as
/// `budget_fuel_transmission_space_usage`. Answers are hashed verbatim, so
/// `"10"` and `"10.0"` produce different keys.
///
/// # Examples
/// ```
/// use carmatch_core::{Persona, PersonaKey};
///
/// # fn main() -> Result<(), carmatch_core::PersonaError> {
/// let a = Persona::new("6", "Petrol", "Manual", "Small", "City")?;
/// let b = Persona::new("6", "Petrol", "Manual", "Small", "City")?;
/// assert_eq!(PersonaKey::from_persona(&a), PersonaKey::from_persona(&b));
/// assert_eq!(a.key().as_str().len(), 64);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonaKey(String);

impl PersonaKey {
    /// Separator placed between answers before hashing.
    pub const SEPARATOR: &'static str = "_";

    /// Hash the persona's answers into a key.
    #[must_use]
    pub fn from_persona(persona: &Persona) -> Self {
        let joined = persona.values.join(Self::SEPARATOR);
        let digest = Sha256::digest(joined.as_bytes());
        Self(hex::encode(digest))
    }

    /// Wrap an existing key, such as one read back from storage.
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Return the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
