//! Logged food model
//!
//! A single logging action: a nutrient snapshot of a reference food plus the
//! grams eaten and the meal it belongs to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{FoodRecord, FoodSource, Macros, Micronutrients};

/// Meal slot, in the canonical display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl MealType {
    /// Canonical order used when a day is shown meal by meal
    pub const ORDER: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snacks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snacks => "snacks",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" | "café da manhã" | "cafe da manha" => Some(MealType::Breakfast),
            "lunch" | "almoço" | "almoco" => Some(MealType::Lunch),
            "dinner" | "jantar" => Some(MealType::Dinner),
            "snacks" | "snack" | "lanches" | "lanche" => Some(MealType::Snacks),
            _ => None,
        }
    }

    /// Label shown to the user
    pub fn label(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Café da Manhã",
            MealType::Lunch => "Almoço",
            MealType::Dinner => "Jantar",
            MealType::Snacks => "Lanches",
        }
    }
}

/// A logged food with its nutrient snapshot.
///
/// Nutrient values are copied at logging time and stay per 100g; a later
/// change to the reference table never alters an existing entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedFoodEntry {
    pub id: String,
    pub food_id: i64,
    pub name: String,
    pub source: FoodSource,
    #[serde(flatten)]
    pub macros: Macros,
    #[serde(flatten)]
    pub micros: Micronutrients,
    /// Grams eaten
    pub quantity: f64,
    pub meal: MealType,
    pub timestamp: DateTime<Utc>,
}

impl LoggedFoodEntry {
    /// Snapshot `food` as a new entry with a fresh id
    pub fn snapshot(food: &FoodRecord, quantity: f64, meal: MealType, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: new_entry_id(food.id),
            food_id: food.id,
            name: food.name.clone(),
            source: food.source,
            macros: food.macros,
            micros: food.micros,
            quantity,
            meal,
            timestamp,
        }
    }

    /// Macros actually eaten (per-100g values scaled by quantity)
    pub fn consumed(&self) -> Macros {
        self.macros.scale(self.quantity / 100.0)
    }
}

/// `<food id>-<random suffix>`; the suffix keeps two logs of the same food
/// within one instant distinct
fn new_entry_id(food_id: i64) -> String {
    format!("{}-{}", food_id, Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn rice() -> FoodRecord {
        FoodRecord::new(1, "Arroz, branco, cozido", FoodSource::Taco, Macros::new(128.0, 2.5, 28.1, 0.2))
    }

    #[test]
    fn test_meal_type_from_str() {
        assert_eq!(MealType::from_str("Lunch"), Some(MealType::Lunch));
        assert_eq!(MealType::from_str("Café da Manhã"), Some(MealType::Breakfast));
        assert_eq!(MealType::from_str("snack"), Some(MealType::Snacks));
        assert_eq!(MealType::from_str("brunch"), None);
    }

    #[test]
    fn test_snapshot_ids_are_unique() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let a = LoggedFoodEntry::snapshot(&rice(), 150.0, MealType::Lunch, at);
        let b = LoggedFoodEntry::snapshot(&rice(), 150.0, MealType::Lunch, at);
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("1-"));
        assert_eq!(a.food_id, 1);
    }

    #[test]
    fn test_snapshot_is_decoupled_from_reference() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let mut food = rice();
        let entry = LoggedFoodEntry::snapshot(&food, 200.0, MealType::Dinner, at);
        food.macros.calories = 999.0;
        assert_eq!(entry.macros.calories, 128.0);
        assert!((entry.consumed().calories - 256.0).abs() < 1e-9);
    }

    #[test]
    fn test_entry_json_shape() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let entry = LoggedFoodEntry::snapshot(&rice(), 150.0, MealType::Snacks, at);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["meal"], "snacks");
        assert_eq!(json["calories"], 128.0);
        assert_eq!(json["timestamp"], "2025-03-01T12:00:00Z");
        let back: LoggedFoodEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }
}
