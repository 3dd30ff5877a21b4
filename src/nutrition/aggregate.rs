//! Daily log aggregation
//!
//! Folds logged entries into consumed totals. Every partial total (entry,
//! meal, day, recent items) goes through [`per_entry_calories`] or
//! [`LoggedFoodEntry::consumed`] so all views agree.

use serde::Serialize;

use crate::models::{LoggedFoodEntry, Macros, MealType};

/// Entries shown in the "recently added" list of the daily summary
pub const RECENT_ENTRY_COUNT: usize = 4;

/// Consumed calories, protein, carbs and fat for a sequence of entries
pub fn aggregate<'a, I>(entries: I) -> Macros
where
    I: IntoIterator<Item = &'a LoggedFoodEntry>,
{
    entries.into_iter().map(LoggedFoodEntry::consumed).sum()
}

/// Calories contributed by a single entry
pub fn per_entry_calories(entry: &LoggedFoodEntry) -> f64 {
    entry.macros.calories * entry.quantity / 100.0
}

/// Entries of one meal with their calorie subtotal
#[derive(Debug, Clone, Serialize)]
pub struct MealGroup<'a> {
    pub meal: MealType,
    pub entries: Vec<&'a LoggedFoodEntry>,
    pub calories: f64,
}

/// Partition entries by meal.
///
/// Groups come out in canonical order (breakfast, lunch, dinner, snacks)
/// whatever the insertion order; entries keep their insertion order inside a
/// group. Meals with no entries are left out.
pub fn group_by_meal(entries: &[LoggedFoodEntry]) -> Vec<MealGroup<'_>> {
    MealType::ORDER
        .iter()
        .filter_map(|meal| {
            let members: Vec<&LoggedFoodEntry> = entries.iter().filter(|e| e.meal == *meal).collect();
            if members.is_empty() {
                return None;
            }
            let calories: f64 = members.iter().map(|e| per_entry_calories(e)).sum();
            Some(MealGroup {
                meal: *meal,
                entries: members,
                calories,
            })
        })
        .collect()
}

/// The last `count` entries, newest first
pub fn recent_entries(entries: &[LoggedFoodEntry], count: usize) -> Vec<&LoggedFoodEntry> {
    entries.iter().rev().take(count).collect()
}

/// Consumed-versus-target view of one day
#[derive(Debug, Clone, Serialize)]
pub struct DailySummary {
    /// Daily energy target (GET / TDEE), kcal
    pub target_calories: i64,
    pub consumed: Macros,
    /// Target minus consumed, never below zero
    pub remaining_calories: f64,
    /// Consumed share of the target, capped at 100
    pub progress_percent: f64,
    /// Consumed macros rounded to whole grams/kcal for display
    pub consumed_rounded: Macros,
    pub entry_count: usize,
}

impl DailySummary {
    pub fn build(target_calories: i64, entries: &[LoggedFoodEntry]) -> Self {
        let consumed = aggregate(entries);
        let target = target_calories as f64;
        let remaining_calories = (target - consumed.calories).max(0.0);
        let progress_percent = if target > 0.0 {
            (consumed.calories / target * 100.0).min(100.0)
        } else {
            0.0
        };

        Self {
            target_calories,
            consumed,
            remaining_calories,
            progress_percent,
            consumed_rounded: consumed.rounded(),
            entry_count: entries.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FoodRecord, FoodSource};
    use chrono::{TimeZone, Utc};

    fn entry(calories: f64, protein: f64, quantity: f64, meal: MealType) -> LoggedFoodEntry {
        let food = FoodRecord::new(1, "Test", FoodSource::Taco, Macros::new(calories, protein, 10.0, 1.0));
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        LoggedFoodEntry::snapshot(&food, quantity, meal, at)
    }

    #[test]
    fn test_aggregate_empty_is_zero() {
        assert_eq!(aggregate(&Vec::<LoggedFoodEntry>::new()), Macros::zero());
    }

    #[test]
    fn test_aggregate_scales_by_quantity() {
        let entries = vec![entry(128.0, 2.5, 200.0, MealType::Lunch)];
        let totals = aggregate(&entries);
        assert!((totals.calories - 256.0).abs() < 1e-9);
        assert!((totals.protein - 5.0).abs() < 1e-9);
        assert!((totals.carbs - 20.0).abs() < 1e-9);
        assert!((per_entry_calories(&entries[0]) - 256.0).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_is_order_independent() {
        let entries = vec![
            entry(128.0, 2.5, 150.0, MealType::Lunch),
            entry(884.0, 0.0, 13.0, MealType::Lunch),
            entry(61.0, 3.3, 245.5, MealType::Breakfast),
            entry(165.0, 31.0, 120.0, MealType::Dinner),
        ];
        let forward = aggregate(&entries);
        let reversed = aggregate(entries.iter().rev());
        let mut rotated = entries.clone();
        rotated.rotate_left(2);
        let rotated = aggregate(&rotated);

        for other in [reversed, rotated] {
            assert!((forward.calories - other.calories).abs() < 1e-9);
            assert!((forward.protein - other.protein).abs() < 1e-9);
            assert!((forward.carbs - other.carbs).abs() < 1e-9);
            assert!((forward.fat - other.fat).abs() < 1e-9);
        }
    }

    #[test]
    fn test_group_by_meal_canonical_order() {
        let entries = vec![
            entry(100.0, 1.0, 100.0, MealType::Snacks),
            entry(200.0, 1.0, 50.0, MealType::Breakfast),
            entry(300.0, 1.0, 100.0, MealType::Snacks),
            entry(50.0, 1.0, 200.0, MealType::Dinner),
        ];

        let groups = group_by_meal(&entries);
        let meals: Vec<MealType> = groups.iter().map(|g| g.meal).collect();
        assert_eq!(meals, vec![MealType::Breakfast, MealType::Dinner, MealType::Snacks]);

        let snacks = &groups[2];
        assert_eq!(snacks.entries[0].id, entries[0].id);
        assert_eq!(snacks.entries[1].id, entries[2].id);
        assert!((snacks.calories - 400.0).abs() < 1e-9);
        assert!((groups[0].calories - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_recent_entries_newest_first() {
        let entries: Vec<LoggedFoodEntry> = (1..=6)
            .map(|i| entry(10.0 * i as f64, 1.0, 100.0, MealType::Lunch))
            .collect();
        let recent = recent_entries(&entries, RECENT_ENTRY_COUNT);
        let ids: Vec<&str> = recent.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec![&entries[5].id[..], &entries[4].id[..], &entries[3].id[..], &entries[2].id[..]]);
        assert_eq!(recent_entries(&entries[..2], RECENT_ENTRY_COUNT).len(), 2);
    }

    #[test]
    fn test_daily_summary() {
        let entries = vec![entry(128.0, 2.5, 200.0, MealType::Lunch)];
        let summary = DailySummary::build(2556, &entries);
        assert!((summary.remaining_calories - 2300.0).abs() < 1e-9);
        assert!((summary.progress_percent - 256.0 / 2556.0 * 100.0).abs() < 1e-9);
        assert_eq!(summary.consumed_rounded.calories, 256.0);
        assert_eq!(summary.entry_count, 1);
    }

    #[test]
    fn test_daily_summary_over_target() {
        let entries = vec![entry(884.0, 0.0, 300.0, MealType::Dinner)];
        let summary = DailySummary::build(2000, &entries);
        assert_eq!(summary.remaining_calories, 0.0);
        assert_eq!(summary.progress_percent, 100.0);
    }
}
