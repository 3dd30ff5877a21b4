//! Log mutation operations
//!
//! Pure copy-on-write transformations of a [`DailyLog`]. Every operation takes
//! the date explicitly and returns a new log; only the touched day gets a new
//! sequence, all other days are shared with the input.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::debug;

use crate::models::{DailyLog, FoodRecord, LoggedFoodEntry, MealType};

/// What a removal or substitution did to the log
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Mutation {
    /// The log changed; carries the removed entry or the replacement
    Applied { entry: LoggedFoodEntry },
    /// No entry with the requested id on that date; the log is unchanged
    NotFound,
}

impl Mutation {
    pub fn is_applied(&self) -> bool {
        matches!(self, Mutation::Applied { .. })
    }
}

/// Append a snapshot of `food` to the end of the day's sequence.
///
/// The day is created if it has no sequence yet. Always succeeds, so the new
/// entry is returned directly. Quantity is taken as given; validation belongs
/// to the caller.
pub fn append(
    log: &DailyLog,
    date: NaiveDate,
    food: &FoodRecord,
    quantity: f64,
    meal: MealType,
    logged_at: DateTime<Utc>,
) -> (DailyLog, LoggedFoodEntry) {
    let entry = LoggedFoodEntry::snapshot(food, quantity, meal, logged_at);

    let mut entries = log.day(date).to_vec();
    entries.push(entry.clone());

    debug!(%date, food_id = food.id, entry_id = %entry.id, "appended entry");
    (log.with_day(date, entries), entry)
}

/// Drop the entry with `entry_id` from the day.
///
/// A missing id leaves the log untouched, including the day's identity.
/// Removing the last entry of a day drops the day from the log.
pub fn remove(log: &DailyLog, date: NaiveDate, entry_id: &str) -> (DailyLog, Mutation) {
    let Some(removed) = log.find_entry(date, entry_id).cloned() else {
        debug!(%date, entry_id, "remove: entry not found");
        return (log.clone(), Mutation::NotFound);
    };

    let entries: Vec<LoggedFoodEntry> = log
        .day(date)
        .iter()
        .filter(|e| e.id != entry_id)
        .cloned()
        .collect();

    debug!(%date, entry_id, remaining = entries.len(), "removed entry");
    let next = if entries.is_empty() {
        log.without_day(date)
    } else {
        log.with_day(date, entries)
    };
    (next, Mutation::Applied { entry: removed })
}

/// Replace the entry with `entry_id` by a snapshot of `new_food`.
///
/// The replacement gets a fresh id but keeps the original quantity, meal,
/// timestamp and position in the day.
pub fn substitute(
    log: &DailyLog,
    date: NaiveDate,
    entry_id: &str,
    new_food: &FoodRecord,
) -> (DailyLog, Mutation) {
    let Some(original) = log.find_entry(date, entry_id) else {
        debug!(%date, entry_id, "substitute: entry not found");
        return (log.clone(), Mutation::NotFound);
    };

    let replacement = LoggedFoodEntry::snapshot(new_food, original.quantity, original.meal, original.timestamp);

    let mut entries = log.day(date).to_vec();
    if let Some(slot) = entries.iter_mut().find(|e| e.id == entry_id) {
        *slot = replacement.clone();
    }

    debug!(%date, entry_id, new_id = %replacement.id, food_id = new_food.id, "substituted entry");
    (log.with_day(date, entries), Mutation::Applied { entry: replacement })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::{aggregate, per_entry_calories};
    use crate::reference::FoodTable;
    use chrono::TimeZone;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, hour, 0, 0).unwrap()
    }

    fn three_entry_log(table: &FoodTable) -> DailyLog {
        let log = DailyLog::new();
        let (log, _) = append(&log, today(), table.get(5).unwrap(), 50.0, MealType::Breakfast, at(8));
        let (log, _) = append(&log, today(), table.get(1).unwrap(), 150.0, MealType::Lunch, at(12));
        let (log, _) = append(&log, today(), table.get(3).unwrap(), 120.0, MealType::Lunch, at(12));
        log
    }

    #[test]
    fn test_append_preserves_order() {
        let table = FoodTable::builtin();
        let log = three_entry_log(&table);
        let before: Vec<String> = log.day(today()).iter().map(|e| e.id.clone()).collect();

        let (next, added) = append(&log, today(), table.get(19).unwrap(), 130.0, MealType::Snacks, at(16));
        let day = next.day(today());
        assert_eq!(day.len(), 4);
        assert_eq!(day[..3].iter().map(|e| e.id.clone()).collect::<Vec<_>>(), before);
        assert_eq!(day[3].food_id, 19);
        assert_eq!(day[3], added);

        // The input log is untouched
        assert_eq!(log.day(today()).len(), 3);
    }

    #[test]
    fn test_append_creates_day_and_shares_others() {
        let table = FoodTable::builtin();
        let log = three_entry_log(&table);
        let tomorrow = today().succ_opt().unwrap();

        let (next, _) = append(&log, tomorrow, table.get(9).unwrap(), 100.0, MealType::Snacks, at(20));
        assert_eq!(next.day(tomorrow).len(), 1);
        assert!(next.shares_day(&log, today()));
        assert!(!log.contains_day(tomorrow));
    }

    #[test]
    fn test_remove() {
        let table = FoodTable::builtin();
        let log = three_entry_log(&table);
        let target = log.day(today())[1].id.clone();

        let (next, outcome) = remove(&log, today(), &target);
        assert_eq!(outcome, Mutation::Applied { entry: log.day(today())[1].clone() });
        let ids: Vec<&str> = next.day(today()).iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec![log.day(today())[0].id.as_str(), log.day(today())[2].id.as_str()]);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let table = FoodTable::builtin();
        let log = three_entry_log(&table);

        let (next, outcome) = remove(&log, today(), "999-nope");
        assert_eq!(outcome, Mutation::NotFound);
        assert_eq!(next.day(today()), log.day(today()));
        assert_eq!(next.day(today()).len(), 3);
        assert!(next.shares_day(&log, today()));

        // Unknown date as well
        let (next, outcome) = remove(&log, today().pred_opt().unwrap(), "999-nope");
        assert_eq!(outcome, Mutation::NotFound);
        assert!(!next.contains_day(today().pred_opt().unwrap()));
    }

    #[test]
    fn test_removing_last_entry_drops_the_day() {
        let table = FoodTable::builtin();
        let tomorrow = today().succ_opt().unwrap();
        let (log, only) = append(&three_entry_log(&table), tomorrow, table.get(9).unwrap(), 100.0, MealType::Snacks, at(16));

        let (next, outcome) = remove(&log, tomorrow, &only.id);
        assert!(outcome.is_applied());
        assert!(!next.contains_day(tomorrow));
        assert!(next.shares_day(&log, today()));
        assert_eq!(next.dates_newest_first(), vec![today()]);
    }

    #[test]
    fn test_substitute_keeps_quantity_meal_timestamp_and_position() {
        let table = FoodTable::builtin();
        let log = three_entry_log(&table);
        let original = log.day(today())[1].clone();
        assert_eq!(original.food_id, 1);

        let potato = table.get(6).unwrap();
        let (next, outcome) = substitute(&log, today(), &original.id, potato);

        let day = next.day(today());
        assert_eq!(day.len(), 3);
        let replaced = &day[1];
        assert_eq!(replaced.food_id, 6);
        assert_eq!(replaced.name, potato.name);
        assert_eq!(replaced.macros, potato.macros);
        assert_eq!(replaced.quantity, 150.0);
        assert_eq!(replaced.meal, MealType::Lunch);
        assert_eq!(replaced.timestamp, original.timestamp);
        assert_ne!(replaced.id, original.id);
        assert_eq!(outcome, Mutation::Applied { entry: replaced.clone() });

        // Neighbours are untouched
        assert_eq!(day[0], log.day(today())[0]);
        assert_eq!(day[2], log.day(today())[2]);
    }

    #[test]
    fn test_substitute_unknown_id_is_noop() {
        let table = FoodTable::builtin();
        let log = three_entry_log(&table);
        let (next, outcome) = substitute(&log, today(), "missing", table.get(6).unwrap());
        assert_eq!(outcome, Mutation::NotFound);
        assert!(next.shares_day(&log, today()));
    }

    #[test]
    fn test_logged_rice_contributes_256_kcal() {
        let table = FoodTable::builtin();
        let (log, _) = append(&DailyLog::new(), today(), table.get(1).unwrap(), 200.0, MealType::Lunch, at(12));
        let day = log.day(today());
        assert!((per_entry_calories(&day[0]) - 256.0).abs() < 1e-9);
        assert!((aggregate(day).calories - 256.0).abs() < 1e-9);
    }
}
