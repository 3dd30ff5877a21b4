//! NutriLog Tools module
//!
//! MCP tool implementations for the nutrition diary.

pub mod diary;
pub mod foods;
pub mod goals;
pub mod photo;
pub mod profile;
pub mod reports;
pub mod status;

use chrono::NaiveDate;

use crate::models::MealType;

/// Parse a YYYY-MM-DD date, defaulting to today in local time
pub fn resolve_date(date: Option<&str>) -> Result<NaiveDate, String> {
    match date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map_err(|e| format!("Invalid date '{}': {} (expected YYYY-MM-DD)", d, e)),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

pub fn parse_meal(meal: &str) -> Result<MealType, String> {
    MealType::from_str(meal).ok_or_else(|| {
        format!("Unknown meal '{}' (expected breakfast, lunch, dinner or snacks)", meal)
    })
}
