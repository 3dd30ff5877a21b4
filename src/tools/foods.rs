//! Food Reference MCP Tools
//!
//! Search the composition table and suggest nutritionally similar foods.

use chrono::NaiveDate;
use serde::Serialize;

use crate::app::AppState;
use crate::models::FoodRecord;
use crate::nutrition::rank_similar_foods;

#[derive(Debug, Serialize)]
pub struct SearchFoodsResponse {
    pub query: String,
    pub foods: Vec<FoodRecord>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct Suggestion {
    pub food: FoodRecord,
    /// Lower is more similar
    pub score: f64,
}

#[derive(Debug, Serialize)]
pub struct SuggestSubstitutesResponse {
    pub base: FoodRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<String>,
    pub suggestions: Vec<Suggestion>,
}

/// Where the base food for suggestions comes from
#[derive(Debug, Clone)]
pub enum SubstituteBase {
    Food(i64),
    Entry { date: NaiveDate, entry_id: String },
}

pub fn search_foods(state: &AppState, query: &str, limit: usize) -> SearchFoodsResponse {
    let foods: Vec<FoodRecord> = state
        .table()
        .search(query)
        .into_iter()
        .take(limit)
        .cloned()
        .collect();

    SearchFoodsResponse {
        query: query.to_string(),
        count: foods.len(),
        foods,
    }
}

pub fn get_food(state: &AppState, id: i64) -> Option<FoodRecord> {
    state.table().get(id).cloned()
}

/// Rank the table against a food, or against the food behind a logged entry.
///
/// A logged entry resolves through its `food_id`; when that food is no longer
/// in the table there is nothing to compare against.
pub fn suggest_substitutes(
    state: &AppState,
    base: SubstituteBase,
    count: usize,
) -> Result<SuggestSubstitutesResponse, String> {
    let (food_id, entry_id) = match base {
        SubstituteBase::Food(id) => (id, None),
        SubstituteBase::Entry { date, entry_id } => {
            let entry = state
                .log()
                .find_entry(date, &entry_id)
                .ok_or_else(|| format!("No logged entry {} on {}", entry_id, date))?;
            (entry.food_id, Some(entry_id))
        }
    };

    let base = state
        .table()
        .get(food_id)
        .ok_or_else(|| format!("Food {} is not in the reference table", food_id))?;

    let suggestions = rank_similar_foods(base, state.table().all(), count)
        .into_iter()
        .map(|scored| Suggestion {
            food: scored.food.clone(),
            score: scored.score,
        })
        .collect();

    Ok(SuggestSubstitutesResponse {
        base: base.clone(),
        entry_id,
        suggestions,
    })
}
