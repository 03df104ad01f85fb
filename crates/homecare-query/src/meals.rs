//! # Meal Cost Projections
//!
//! Meal entries record a daily amount per child and meal type. A child's
//! daily cost is the sum of all their entries; longer periods scale the
//! daily figure by 7, 30 and 365 days.

use serde::Serialize;

use homecare_core::{AppState, MealEntry};

/// Cost of one day scaled to a week, a month and a year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PeriodProjection {
    pub daily: f64,
    pub weekly: f64,
    pub monthly: f64,
    pub yearly: f64,
}

impl PeriodProjection {
    pub const DAYS_PER_WEEK: f64 = 7.0;
    pub const DAYS_PER_MONTH: f64 = 30.0;
    pub const DAYS_PER_YEAR: f64 = 365.0;

    pub fn from_daily(daily: f64) -> Self {
        Self {
            daily,
            weekly: daily * Self::DAYS_PER_WEEK,
            monthly: daily * Self::DAYS_PER_MONTH,
            yearly: daily * Self::DAYS_PER_YEAR,
        }
    }
}

/// The projected meal cost of one child.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChildMealProjection {
    pub child: String,
    #[serde(flatten)]
    pub projection: PeriodProjection,
}

/// Projections per child.
///
/// Children appear in the order their first meal entry does; children
/// with no entries follow with zero costs, in collection order. Entries
/// without a child are grouped under the empty name.
pub fn meal_projections(state: &AppState) -> Vec<ChildMealProjection> {
    let mut daily: Vec<(String, f64)> = Vec::new();
    for meal in &state.meals {
        let name = meal.child.as_deref().unwrap_or("");
        match daily.iter_mut().find(|(child, _)| child == name) {
            Some((_, total)) => *total += meal.amount_or_zero(),
            None => daily.push((name.to_string(), meal.amount_or_zero())),
        }
    }
    for name in state.child_names() {
        if !daily.iter().any(|(child, _)| child == name) {
            daily.push((name.to_string(), 0.0));
        }
    }
    daily
        .into_iter()
        .map(|(child, total)| ChildMealProjection {
            child,
            projection: PeriodProjection::from_daily(total),
        })
        .collect()
}

/// Projection of the combined daily cost of all entries.
pub fn meal_totals(meals: &[MealEntry]) -> PeriodProjection {
    PeriodProjection::from_daily(meals.iter().map(MealEntry::amount_or_zero).sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use homecare_core::Child;

    fn meal(child: &str, meal_type: &str, amount: f64) -> MealEntry {
        MealEntry {
            child: Some(child.into()),
            meal_type: Some(meal_type.into()),
            amount: Some(amount),
            ..Default::default()
        }
    }

    fn named(name: &str) -> Child {
        Child {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    #[test]
    fn two_meal_types_project_over_periods() {
        let state = AppState {
            meals: vec![
                meal("Amina", "Breakfast", 100.0),
                meal("Amina", "Lunch", 50.0),
            ],
            ..Default::default()
        };
        let rows = meal_projections(&state);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].child, "Amina");
        assert_eq!(
            rows[0].projection,
            PeriodProjection {
                daily: 150.0,
                weekly: 1050.0,
                monthly: 4500.0,
                yearly: 54750.0,
            }
        );
    }

    #[test]
    fn children_without_meals_follow_with_zeros() {
        let state = AppState {
            children: vec![named("Amina K"), named("Brian O"), named("Chloe N")],
            meals: vec![
                meal("Chloe N", "Supper", 80.0),
                meal("Amina K", "Snack", 20.0),
            ],
            ..Default::default()
        };
        let names: Vec<_> = meal_projections(&state)
            .into_iter()
            .map(|r| r.child)
            .collect();
        assert_eq!(names, ["Chloe N", "Amina K", "Brian O"]);
        let brian = &meal_projections(&state)[2];
        assert_eq!(brian.projection, PeriodProjection::default());
    }

    #[test]
    fn totals_cover_all_entries() {
        let meals = vec![
            meal("A", "Lunch", 60.0),
            meal("B", "Lunch", 40.0),
            MealEntry::default(),
        ];
        let totals = meal_totals(&meals);
        assert_eq!(totals.daily, 100.0);
        assert_eq!(totals.yearly, 36_500.0);
    }

    #[test]
    fn projection_serializes_flat() {
        let row = ChildMealProjection {
            child: "Amina".into(),
            projection: PeriodProjection::from_daily(10.0),
        };
        let v = serde_json::to_value(&row).unwrap();
        assert_eq!(v["child"], "Amina");
        assert_eq!(v["weekly"], 70.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn entry(amount: u32) -> MealEntry {
        MealEntry {
            child: Some("Amina K".into()),
            amount: Some(f64::from(amount)),
            ..Default::default()
        }
    }

    proptest! {
        #[test]
        fn projection_is_linear_in_the_daily_cost(a in 0u32..100_000, b in 0u32..100_000) {
            let (a, b) = (f64::from(a), f64::from(b));
            let sum = PeriodProjection::from_daily(a + b);
            let left = PeriodProjection::from_daily(a);
            let right = PeriodProjection::from_daily(b);
            prop_assert_eq!(sum.weekly, left.weekly + right.weekly);
            prop_assert_eq!(sum.monthly, left.monthly + right.monthly);
            prop_assert_eq!(sum.yearly, left.yearly + right.yearly);
        }

        #[test]
        fn totals_project_the_sum_of_entries(
            amounts in proptest::collection::vec(0u32..10_000, 0..30),
        ) {
            let meals: Vec<MealEntry> = amounts.iter().copied().map(entry).collect();
            let daily: f64 = amounts.iter().copied().map(f64::from).sum();
            prop_assert_eq!(meal_totals(&meals), PeriodProjection::from_daily(daily));
        }
    }
}
