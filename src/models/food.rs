//! Food reference model
//!
//! Immutable nutrient records from the TACO and IBGE composition tables,
//! with all values per 100 grams.

use serde::{Deserialize, Serialize};

use super::Macros;

/// Provenance of a reference record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodSource {
    #[serde(rename = "TACO")]
    Taco,
    #[serde(rename = "IBGE 2025", alias = "IBGE2025")]
    Ibge2025,
}

impl FoodSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FoodSource::Taco => "TACO",
            FoodSource::Ibge2025 => "IBGE 2025",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "TACO" => Some(FoodSource::Taco),
            "IBGE 2025" | "IBGE2025" => Some(FoodSource::Ibge2025),
            _ => None,
        }
    }
}

/// Optional micronutrients per 100g.
///
/// `None` means the composition table has no value, which is not the same as
/// the food containing none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Micronutrients {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiber: Option<f64>, // g
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sodium: Option<f64>, // mg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calcium: Option<f64>, // mg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iron: Option<f64>, // mg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zinc: Option<f64>, // mg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vitamin_a: Option<f64>, // mcg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vitamin_c: Option<f64>, // mg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vitamin_d: Option<f64>, // mcg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vitamin_e: Option<f64>, // mg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vitamin_k: Option<f64>, // mcg
}

/// A reference food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    pub id: i64,
    pub name: String,
    pub source: FoodSource,
    #[serde(flatten)]
    pub macros: Macros,
    #[serde(flatten)]
    pub micros: Micronutrients,
}

impl FoodRecord {
    pub fn new(id: i64, name: impl Into<String>, source: FoodSource, macros: Macros) -> Self {
        Self {
            id,
            name: name.into(),
            source,
            macros,
            micros: Micronutrients::default(),
        }
    }

    pub fn with_micros(mut self, micros: Micronutrients) -> Self {
        self.micros = micros;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_round_trip() {
        assert_eq!(FoodSource::from_str("taco"), Some(FoodSource::Taco));
        assert_eq!(FoodSource::from_str("IBGE2025"), Some(FoodSource::Ibge2025));
        assert_eq!(FoodSource::from_str(FoodSource::Ibge2025.as_str()), Some(FoodSource::Ibge2025));
        assert_eq!(FoodSource::from_str("USDA"), None);
    }

    #[test]
    fn test_absent_micros_are_not_serialized() {
        let food = FoodRecord::new(1, "Arroz, branco, cozido", FoodSource::Taco, Macros::new(128.0, 2.5, 28.1, 0.2))
            .with_micros(Micronutrients { fiber: Some(0.9), ..Default::default() });
        let json = serde_json::to_value(&food).unwrap();
        assert_eq!(json["source"], "TACO");
        assert_eq!(json["calories"], 128.0);
        assert_eq!(json["fiber"], 0.9);
        assert!(json.get("vitaminC").is_none());
    }

    #[test]
    fn test_deserialize_accepts_compact_ibge_tag() {
        let food: FoodRecord = serde_json::from_str(
            r#"{"id": 6, "name": "Batata, inglesa, cozida", "source": "IBGE2025",
                "calories": 86, "protein": 2, "carbs": 20, "fat": 0.1, "vitaminC": 9.6}"#,
        )
        .unwrap();
        assert_eq!(food.source, FoodSource::Ibge2025);
        assert_eq!(food.micros.vitamin_c, Some(9.6));
        assert_eq!(food.micros.zinc, None);
    }
}
