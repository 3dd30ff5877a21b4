//! Nutrition calculation module
//!
//! Energy targets, goal planning, food similarity and daily aggregation.

pub mod aggregate;
pub mod energy;
pub mod goals;
pub mod similarity;

pub use aggregate::{
    aggregate, group_by_meal, per_entry_calories, recent_entries, DailySummary, MealGroup,
    RECENT_ENTRY_COUNT,
};
pub use energy::{basal_metabolic_rate, body_mass_index, total_daily_energy_expenditure};
pub use goals::{days_to_goal, BmiCategory, GoalPlan};
pub use similarity::{
    find_similar_foods, rank_similar_foods, similarity_score, ScoredFood, DEFAULT_SUGGESTION_COUNT,
};
