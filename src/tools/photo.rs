//! Photo Analysis MCP Tool
//!
//! Reads a meal photo, asks the vision service what is on the plate, matches
//! the identified names against the reference table and optionally logs the
//! matched items. The state lock is only taken once the analysis is back.

use std::sync::Mutex;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::app::AppState;
use crate::models::{FoodRecord, LoggedFoodEntry, MealType};
use crate::vision::{analyze_image, match_identified_foods, FoodImageAnalyzer};

#[derive(Debug, Serialize)]
pub struct PhotoItem {
    pub food_name: String,
    pub quantity_grams: f64,
    /// Reference food the name resolved to
    pub food: Option<FoodRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logged_entry_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PhotoAnalysisResponse {
    pub file_path: String,
    pub items: Vec<PhotoItem>,
    pub matched_count: usize,
    pub unmatched_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logged_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logged_meal: Option<MealType>,
    pub logged: Vec<LoggedFoodEntry>,
}

/// Analyze the photo at `file_path`; with `log_into`, log every matched item
/// with a positive quantity into that date and meal
pub async fn analyze_food_photo(
    state: &Mutex<AppState>,
    analyzer: &dyn FoodImageAnalyzer,
    file_path: &str,
    log_into: Option<(NaiveDate, MealType)>,
) -> Result<PhotoAnalysisResponse, String> {
    let image = tokio::fs::read(file_path)
        .await
        .map_err(|e| format!("Cannot read {}: {}", file_path, e))?;

    let identified = analyze_image(analyzer, &image).await.map_err(|e| {
        warn!(error = %e, file_path, "photo analysis failed");
        e.user_message().to_string()
    })?;

    let mut state = state.lock().map_err(|_| "State lock poisoned".to_string())?;

    let mut items: Vec<PhotoItem> = match_identified_foods(identified, state.table(), state.matcher())
        .into_iter()
        .map(|m| {
            if m.food.is_none() {
                warn!(food_name = %m.identified.food_name, "identified food has no match in the table");
            }
            PhotoItem {
                food_name: m.identified.food_name,
                quantity_grams: m.identified.quantity_grams,
                food: m.food.cloned(),
                logged_entry_id: None,
            }
        })
        .collect();

    let mut logged = Vec::new();
    if let Some((date, meal)) = log_into {
        let logged_at = Utc::now();
        for item in items.iter_mut() {
            let Some(food_id) = item.food.as_ref().map(|f| f.id) else {
                continue;
            };
            if item.quantity_grams <= 0.0 {
                continue;
            }
            let entry = state
                .log_food(date, food_id, item.quantity_grams, meal, logged_at)
                .map_err(|e| format!("Failed to log {}: {}", item.food_name, e))?;
            item.logged_entry_id = Some(entry.id.clone());
            logged.push(entry);
        }
        info!(%date, meal = meal.as_str(), count = logged.len(), "logged foods from photo");
    }

    let matched_count = items.iter().filter(|i| i.food.is_some()).count();

    Ok(PhotoAnalysisResponse {
        file_path: file_path.to_string(),
        unmatched_count: items.len() - matched_count,
        matched_count,
        items,
        logged_date: log_into.map(|(date, _)| date),
        logged_meal: log_into.map(|(_, meal)| meal),
        logged,
    })
}
