//! Shared macronutrient structure
//!
//! Used for per-100g food values, consumed totals and daily targets.

use serde::{Deserialize, Serialize};

/// Energy and macronutrients
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub calories: f64, // kcal
    pub protein: f64,  // grams
    pub carbs: f64,    // grams
    pub fat: f64,      // grams
}

impl Macros {
    pub fn new(calories: f64, protein: f64, carbs: f64, fat: f64) -> Self {
        Self { calories, protein, carbs, fat }
    }

    /// All zeros
    pub fn zero() -> Self {
        Self::default()
    }

    /// Scale all values by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            calories: self.calories * multiplier,
            protein: self.protein * multiplier,
            carbs: self.carbs * multiplier,
            fat: self.fat * multiplier,
        }
    }

    /// Add another set of macros to this one
    pub fn add(&self, other: &Macros) -> Self {
        Self {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
        }
    }

    /// Values rounded to whole units, as shown in summaries
    pub fn rounded(&self) -> Self {
        Self {
            calories: self.calories.round(),
            protein: self.protein.round(),
            carbs: self.carbs.round(),
            fat: self.fat.round(),
        }
    }
}

impl std::ops::Add for Macros {
    type Output = Macros;

    fn add(self, other: Macros) -> Macros {
        Macros::add(&self, &other)
    }
}

impl std::ops::Mul<f64> for Macros {
    type Output = Macros;

    fn mul(self, multiplier: f64) -> Macros {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for Macros {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Macros::zero(), |acc, m| acc + m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_and_sum() {
        let rice = Macros::new(128.0, 2.5, 28.1, 0.2);
        let total: Macros = vec![rice * 2.0, rice * 0.5].into_iter().sum();
        assert!((total.calories - 320.0).abs() < 1e-9);
        assert!((total.carbs - 70.25).abs() < 1e-9);
    }

    #[test]
    fn test_rounded() {
        let m = Macros::new(255.6, 4.4, 56.5, 0.49);
        assert_eq!(m.rounded(), Macros::new(256.0, 4.0, 57.0, 0.0));
    }
}
