use serde::{Deserialize, Serialize};

use crate::PersonaField;

/// A single car offered by the catalog.
///
/// `price` shares its unit with the persona budget (the bundled catalog uses
/// INR lakhs). The text attributes are free-form and matched by
/// case-insensitive substring search.
///
/// # Examples
/// ```
/// use carmatch_core::{Car, PersonaField};
///
/// let car = Car::new("Alto", 5.0, "Petrol", "Manual", "Small", "City");
/// assert_eq!(car.name, "Alto");
/// assert_eq!(car.attribute(PersonaField::Fuel), Some("Petrol"));
/// assert!(car.attribute(PersonaField::Budget).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    /// Unique model name; keys the preference table.
    pub name: String,
    /// Sticker price in budget units.
    pub price: f64,
    /// Fuel description, e.g. "Petrol" or "Petrol/CNG".
    pub fuel: String,
    /// Transmission description, e.g. "Manual/Automatic".
    pub transmission: String,
    /// Seating or boot space description.
    pub space: String,
    /// Intended usage, e.g. "City/Highway".
    pub usage: String,
}

impl Car {
    /// Construct a car from its attributes.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        price: f64,
        fuel: impl Into<String>,
        transmission: impl Into<String>,
        space: impl Into<String>,
        usage: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            price,
            fuel: fuel.into(),
            transmission: transmission.into(),
            space: space.into(),
            usage: usage.into(),
        }
    }

    /// Return the free-text attribute compared against a persona field.
    ///
    /// The budget is numeric and compared against [`Car::price`] instead, so
    /// [`PersonaField::Budget`] yields `None`.
    #[must_use]
    pub fn attribute(&self, field: PersonaField) -> Option<&str> {
        match field {
            PersonaField::Budget => None,
            PersonaField::Fuel => Some(&self.fuel),
            PersonaField::Transmission => Some(&self.transmission),
            PersonaField::Space => Some(&self.space),
            PersonaField::Usage => Some(&self.usage),
        }
    }
}
