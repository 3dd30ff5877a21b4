//! Food similarity scoring
//!
//! Ranks candidate foods by how close their per-100g macros are to a base
//! food. Each axis contributes its difference relative to the base value:
//!
//! ```text
//! score = 0.50 × Δcalories + 0.25 × Δprotein + 0.15 × Δcarbs + 0.10 × Δfat
//! Δx    = |base.x - candidate.x| / safe(base.x)
//! ```
//!
//! Lower is more similar. A zero base value is replaced by `0.1` in the
//! denominator so foods such as olive oil (no protein, no carbs) still get
//! finite scores; for those axes the result is an approximation, not a true
//! relative difference.

use serde::Serialize;

use crate::models::{FoodRecord, Macros};

/// Suggestions returned when the caller does not ask for a count
pub const DEFAULT_SUGGESTION_COUNT: usize = 5;

const CALORIE_WEIGHT: f64 = 0.5;
const PROTEIN_WEIGHT: f64 = 0.25;
const CARBS_WEIGHT: f64 = 0.15;
const FAT_WEIGHT: f64 = 0.10;

/// Denominator used when the base value is zero
const ZERO_BASE_DENOMINATOR: f64 = 0.1;

/// A candidate together with its score
#[derive(Debug, Clone, Serialize)]
pub struct ScoredFood<'a> {
    pub food: &'a FoodRecord,
    pub score: f64,
}

fn safe(value: f64) -> f64 {
    if value == 0.0 {
        ZERO_BASE_DENOMINATOR
    } else {
        value
    }
}

fn relative_difference(base: f64, candidate: f64) -> f64 {
    (base - candidate).abs() / safe(base)
}

/// Weighted relative-difference score of `candidate` against `base`
pub fn similarity_score(base: &Macros, candidate: &Macros) -> f64 {
    CALORIE_WEIGHT * relative_difference(base.calories, candidate.calories)
        + PROTEIN_WEIGHT * relative_difference(base.protein, candidate.protein)
        + CARBS_WEIGHT * relative_difference(base.carbs, candidate.carbs)
        + FAT_WEIGHT * relative_difference(base.fat, candidate.fat)
}

/// Score every candidate except the base itself, most similar first.
///
/// The sort is stable, so equal scores keep pool order.
pub fn rank_similar_foods<'a>(base: &FoodRecord, pool: &'a [FoodRecord], count: usize) -> Vec<ScoredFood<'a>> {
    let mut scored: Vec<ScoredFood<'a>> = pool
        .iter()
        .filter(|food| food.id != base.id)
        .map(|food| ScoredFood {
            food,
            score: similarity_score(&base.macros, &food.macros),
        })
        .collect();

    scored.sort_by(|a, b| a.score.total_cmp(&b.score));
    scored.truncate(count);
    scored
}

/// The `count` foods closest to `base`, excluding `base` by id
pub fn find_similar_foods<'a>(base: &FoodRecord, pool: &'a [FoodRecord], count: usize) -> Vec<&'a FoodRecord> {
    rank_similar_foods(base, pool, count)
        .into_iter()
        .map(|scored| scored.food)
        .collect()
}
