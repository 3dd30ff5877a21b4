//! Diary MCP Tools
//!
//! Logging, removing and substituting entries, and the day views.

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::app::AppState;
use crate::diary::Mutation;
use crate::models::{LoggedFoodEntry, Macros, MealType};
use crate::nutrition::{
    aggregate, group_by_meal, per_entry_calories, recent_entries, DailySummary, RECENT_ENTRY_COUNT,
};

use super::profile::ONBOARDING_HINT;

/// Response for log_food
#[derive(Debug, Serialize)]
pub struct LogFoodResponse {
    pub date: NaiveDate,
    pub entry: LoggedFoodEntry,
    pub calories: f64,
    pub day_total_calories: f64,
}

/// One item of a batch
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub food_id: i64,
    pub quantity: f64,
}

/// Response for log_foods_batch
#[derive(Debug, Serialize)]
pub struct LogFoodsBatchResponse {
    pub date: NaiveDate,
    pub meal: MealType,
    pub entries: Vec<LoggedFoodEntry>,
    pub calories: f64,
    pub day_total_calories: f64,
}

/// Response for remove_logged_food and substitute_logged_food
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub success: bool,
    pub date: NaiveDate,
    pub entry_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<LoggedFoodEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<LoggedFoodEntry>,
    pub day_total_calories: f64,
}

/// A meal of a day with its subtotal
#[derive(Debug, Serialize)]
pub struct MealView {
    pub meal: MealType,
    pub label: &'static str,
    pub calories: f64,
    pub entries: Vec<EntryView>,
}

#[derive(Debug, Serialize)]
pub struct EntryView {
    #[serde(flatten)]
    pub entry: LoggedFoodEntry,
    pub consumed: Macros,
}

/// Response for get_day
#[derive(Debug, Serialize)]
pub struct DayDetail {
    pub date: NaiveDate,
    pub meals: Vec<MealView>,
    pub totals: Macros,
    pub entry_count: usize,
}

/// Day summary for listing
#[derive(Debug, Serialize)]
pub struct DayListing {
    pub date: NaiveDate,
    pub entry_count: usize,
    pub total_calories: f64,
}

/// Response for list_days
#[derive(Debug, Serialize)]
pub struct ListDaysResponse {
    pub days: Vec<DayListing>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct RecentItem {
    pub id: String,
    pub name: String,
    pub meal: MealType,
    pub quantity: f64,
    pub calories: f64,
}

/// Response for daily_summary
#[derive(Debug, Serialize)]
pub struct DailySummaryResponse {
    pub date: NaiveDate,
    pub profile_name: String,
    #[serde(flatten)]
    pub summary: DailySummary,
    pub recent: Vec<RecentItem>,
}

fn day_calories(state: &AppState, date: NaiveDate) -> f64 {
    aggregate(state.log().day(date)).calories
}

// ============================================================================
// Mutations
// ============================================================================

pub fn log_food(
    state: &mut AppState,
    date: NaiveDate,
    food_id: i64,
    quantity: f64,
    meal: MealType,
) -> Result<LogFoodResponse, String> {
    let entry = state
        .log_food(date, food_id, quantity, meal, Utc::now())
        .map_err(|e| format!("Failed to log food: {}", e))?;

    Ok(LogFoodResponse {
        date,
        calories: per_entry_calories(&entry),
        entry,
        day_total_calories: day_calories(state, date),
    })
}

/// Log several foods into one meal.
///
/// Every item is checked before anything is logged, so a bad item leaves the
/// day unchanged.
pub fn log_foods_batch(
    state: &mut AppState,
    date: NaiveDate,
    meal: MealType,
    items: &[BatchItem],
) -> Result<LogFoodsBatchResponse, String> {
    if items.is_empty() {
        return Err("No items to log".to_string());
    }

    for (index, item) in items.iter().enumerate() {
        if state.table().get(item.food_id).is_none() {
            return Err(format!("Item {}: food {} is not in the reference table", index, item.food_id));
        }
        if !item.quantity.is_finite() || item.quantity <= 0.0 {
            return Err(format!("Item {}: quantity must be positive, got {}", index, item.quantity));
        }
    }

    let logged_at = Utc::now();
    let mut entries = Vec::with_capacity(items.len());
    for item in items {
        let entry = state
            .log_food(date, item.food_id, item.quantity, meal, logged_at)
            .map_err(|e| format!("Failed to log food: {}", e))?;
        entries.push(entry);
    }

    Ok(LogFoodsBatchResponse {
        date,
        meal,
        calories: aggregate(&entries).calories,
        entries,
        day_total_calories: day_calories(state, date),
    })
}

pub fn remove_logged_food(state: &mut AppState, date: NaiveDate, entry_id: &str) -> MutationResponse {
    let outcome = state.remove_entry(date, entry_id);
    let (success, reason, removed) = match outcome {
        Mutation::Applied { entry } => (true, None, Some(entry)),
        Mutation::NotFound => (false, Some("not_found"), None),
    };

    MutationResponse {
        success,
        date,
        entry_id: entry_id.to_string(),
        reason,
        removed,
        replacement: None,
        day_total_calories: day_calories(state, date),
    }
}

pub fn substitute_logged_food(
    state: &mut AppState,
    date: NaiveDate,
    entry_id: &str,
    new_food_id: i64,
) -> Result<MutationResponse, String> {
    let outcome = state
        .substitute_entry(date, entry_id, new_food_id)
        .map_err(|e| format!("Failed to substitute: {}", e))?;

    let (success, reason, replacement) = match outcome {
        Mutation::Applied { entry } => (true, None, Some(entry)),
        Mutation::NotFound => (false, Some("not_found"), None),
    };

    Ok(MutationResponse {
        success,
        date,
        entry_id: entry_id.to_string(),
        reason,
        removed: None,
        replacement,
        day_total_calories: day_calories(state, date),
    })
}

// ============================================================================
// Views
// ============================================================================

pub fn get_day(state: &AppState, date: NaiveDate) -> DayDetail {
    let entries = state.log().day(date);

    let meals = group_by_meal(entries)
        .into_iter()
        .map(|group| MealView {
            meal: group.meal,
            label: group.meal.label(),
            calories: group.calories,
            entries: group
                .entries
                .into_iter()
                .map(|e| EntryView {
                    entry: e.clone(),
                    consumed: e.consumed(),
                })
                .collect(),
        })
        .collect();

    DayDetail {
        date,
        meals,
        totals: aggregate(entries),
        entry_count: entries.len(),
    }
}

/// Days with at least one entry, newest first
pub fn list_days(state: &AppState, limit: Option<usize>) -> ListDaysResponse {
    let dates = state.log().dates_newest_first();
    let total = dates.len();

    let days = dates
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|date| {
            let entries = state.log().day(date);
            DayListing {
                date,
                entry_count: entries.len(),
                total_calories: aggregate(entries).calories,
            }
        })
        .collect();

    ListDaysResponse { days, total }
}

pub fn daily_summary(state: &AppState, date: NaiveDate) -> Result<DailySummaryResponse, String> {
    let profile = state.profile().ok_or_else(|| ONBOARDING_HINT.to_string())?;
    let target = state.daily_target().map_err(|e| e.to_string())?;
    let entries = state.log().day(date);

    let recent = recent_entries(entries, RECENT_ENTRY_COUNT)
        .into_iter()
        .map(|e| RecentItem {
            id: e.id.clone(),
            name: e.name.clone(),
            meal: e.meal,
            quantity: e.quantity,
            calories: per_entry_calories(e),
        })
        .collect();

    Ok(DailySummaryResponse {
        date,
        profile_name: profile.name.clone(),
        summary: DailySummary::build(target, entries),
        recent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::temp_database;
    use crate::models::{ActivityLevel, Gender, UserProfile};
    use tempfile::TempDir;

    fn state() -> (AppState, TempDir) {
        let (dir, database) = temp_database();
        (AppState::load(database).unwrap(), dir)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    #[test]
    fn test_day_views() {
        let (mut state, _dir) = state();

        log_food(&mut state, date(), 1, 200.0, MealType::Lunch).unwrap();
        log_food(&mut state, date(), 13, 200.0, MealType::Breakfast).unwrap();
        let batch = log_foods_batch(
            &mut state,
            date(),
            MealType::Dinner,
            &[BatchItem { food_id: 3, quantity: 100.0 }, BatchItem { food_id: 7, quantity: 50.0 }],
        )
        .unwrap();
        assert_eq!(batch.entries.len(), 2);
        assert!((batch.calories - 172.5).abs() < 1e-9);

        let day = get_day(&state, date());
        let meals: Vec<MealType> = day.meals.iter().map(|m| m.meal).collect();
        assert_eq!(meals, vec![MealType::Breakfast, MealType::Lunch, MealType::Dinner]);
        assert!((day.meals[1].calories - 256.0).abs() < 1e-9);
        // 122 + 256 + 165 + 7.5
        assert!((day.totals.calories - 550.5).abs() < 1e-9);

        let listing = list_days(&state, None);
        assert_eq!(listing.total, 1);
        assert_eq!(listing.days[0].entry_count, 4);
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let (mut state, _dir) = state();
        let result = log_foods_batch(
            &mut state,
            date(),
            MealType::Lunch,
            &[BatchItem { food_id: 1, quantity: 100.0 }, BatchItem { food_id: 404, quantity: 100.0 }],
        );
        assert!(result.is_err());
        assert!(state.log().day(date()).is_empty());
    }

    #[test]
    fn test_unknown_entry_reports_not_found() {
        let (mut state, _dir) = state();
        let response = remove_logged_food(&mut state, date(), "missing");
        assert!(!response.success);
        assert_eq!(response.reason, Some("not_found"));

        let response = substitute_logged_food(&mut state, date(), "missing", 6).unwrap();
        assert!(!response.success);
        assert!(substitute_logged_food(&mut state, date(), "missing", 404).is_err());
    }

    #[test]
    fn test_daily_summary_requires_profile() {
        let (mut state, _dir) = state();
        assert_eq!(daily_summary(&state, date()).unwrap_err(), ONBOARDING_HINT);

        state.set_profile(UserProfile {
            name: "Ana".to_string(),
            age: 30,
            gender: Gender::Male,
            height: 175.0,
            weight: 70.0,
            activity_level: ActivityLevel::ModeratelyActive,
            target_weight: 65.0,
        });
        for food_id in [1, 2, 3, 5, 9] {
            log_food(&mut state, date(), food_id, 100.0, MealType::Lunch).unwrap();
        }

        let summary = daily_summary(&state, date()).unwrap();
        assert_eq!(summary.summary.target_calories, 2556);
        assert_eq!(summary.recent.len(), RECENT_ENTRY_COUNT);
        assert!(summary.recent[0].name.starts_with("Maçã"));
    }
}
