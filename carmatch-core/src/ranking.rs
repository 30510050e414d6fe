//! Ranked recommendation output.

use serde::Serialize;

/// Maximum number of cars returned by a ranking.
pub const RECOMMENDATION_LIMIT: usize = 3;

/// Minimum total score for a car to count as a recommendation.
pub const RECOMMENDATION_THRESHOLD: f64 = 3.0;

/// One scored catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCar {
    /// Car name as listed in the catalog.
    pub name: String,
    /// Number of matched attribute predicates.
    pub rule_score: u8,
    /// Learned adjustment read from the preference table.
    pub adjustment: f64,
    /// `rule_score + adjustment`.
    pub total: f64,
}

impl RankedCar {
    /// Combine a rule score with a learned adjustment.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "total score adds the learned adjustment to the rule score"
    )]
    pub fn new(name: impl Into<String>, rule_score: u8, adjustment: f64) -> Self {
        Self {
            name: name.into(),
            rule_score,
            adjustment,
            total: f64::from(rule_score) + adjustment,
        }
    }

    /// Report whether the total meets [`RECOMMENDATION_THRESHOLD`].
    #[must_use]
    pub fn is_recommended(&self) -> bool {
        self.total >= RECOMMENDATION_THRESHOLD
    }
}

/// Best-first list of at most [`RECOMMENDATION_LIMIT`] cars.
///
/// # Examples
/// ```
/// use carmatch_core::{RankedCar, Ranking};
///
/// let ranking = Ranking::from_scored(vec![
///     RankedCar::new("Alto", 2, 0.0),
///     RankedCar::new("Swift", 4, 0.0),
///     RankedCar::new("Nexon", 4, 0.0),
///     RankedCar::new("City", 1, 0.0),
/// ]);
/// let names: Vec<_> = ranking.iter().map(|car| car.name.as_str()).collect();
/// assert_eq!(names, ["Swift", "Nexon", "Alto"]);
/// assert!(ranking.is_recommendation());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ranking {
    cars: Vec<RankedCar>,
}

impl Ranking {
    /// Sort scored cars best-first and keep the top entries.
    ///
    /// The input is expected in catalog order; the sort is stable so equal
    /// totals keep that order.
    #[must_use]
    pub fn from_scored(mut scored: Vec<RankedCar>) -> Self {
        scored.sort_by(|a, b| b.total.total_cmp(&a.total));
        scored.truncate(RECOMMENDATION_LIMIT);
        Self { cars: scored }
    }

    /// The best-ranked car, if any.
    #[must_use]
    pub fn top(&self) -> Option<&RankedCar> {
        self.cars.first()
    }

    /// Iterate best-first.
    pub fn iter(&self) -> std::slice::Iter<'_, RankedCar> {
        self.cars.iter()
    }

    /// Number of ranked cars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cars.len()
    }

    /// Report whether nothing was ranked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    /// Ranked cars meeting the recommendation threshold, best-first.
    pub fn recommended(&self) -> impl Iterator<Item = &RankedCar> {
        self.cars.iter().filter(|car| car.is_recommended())
    }

    /// Report whether at least one car meets the recommendation threshold.
    #[must_use]
    pub fn is_recommendation(&self) -> bool {
        self.recommended().next().is_some()
    }
}

impl<'a> IntoIterator for &'a Ranking {
    type Item = &'a RankedCar;
    type IntoIter = std::slice::Iter<'a, RankedCar>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn equal_totals_keep_input_order() {
        let ranking = Ranking::from_scored(vec![
            RankedCar::new("first", 3, 0.0),
            RankedCar::new("second", 3, 0.0),
            RankedCar::new("third", 3, 0.0),
            RankedCar::new("fourth", 3, 0.0),
        ]);
        let names: Vec<_> = ranking.iter().map(|car| car.name.as_str()).collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[rstest]
    fn negative_adjustment_can_reorder_cars() {
        let ranking = Ranking::from_scored(vec![
            RankedCar::new("Alto", 4, -0.1),
            RankedCar::new("Swift", 4, 0.0),
        ]);
        assert_eq!(ranking.top().map(|car| car.name.as_str()), Some("Swift"));
    }

    #[rstest]
    #[case(2, 0.9, false)]
    #[case(2, 1.0, true)]
    #[case(3, -0.1, false)]
    #[case(3, 0.0, true)]
    fn recommendation_threshold_uses_total(
        #[case] rule_score: u8,
        #[case] adjustment: f64,
        #[case] expected: bool,
    ) {
        let ranking = Ranking::from_scored(vec![RankedCar::new("Alto", rule_score, adjustment)]);
        assert_eq!(ranking.is_recommendation(), expected);
    }

    #[rstest]
    fn empty_ranking_has_no_top() {
        let ranking = Ranking::from_scored(Vec::new());
        assert!(ranking.top().is_none());
        assert!(!ranking.is_recommendation());
    }
}
