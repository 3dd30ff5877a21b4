//! Weight-loss goal planning
//!
//! A fixed 500 kcal/day deficit under GET, with 7700 kcal counted per
//! kilogram of body fat.

use serde::Serialize;

use crate::models::UserProfile;
use super::energy::{body_mass_index, total_daily_energy_expenditure};

/// Daily deficit for roughly 0.5 kg/week
pub const SUGGESTED_DEFICIT: i64 = 500;

/// Energy stored in one kilogram of body fat
pub const KCAL_PER_KG: f64 = 7700.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 24.9 {
            BmiCategory::Normal
        } else if bmi < 29.9 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Abaixo do peso",
            BmiCategory::Normal => "Peso normal",
            BmiCategory::Overweight => "Sobrepeso",
            BmiCategory::Obese => "Obesidade",
        }
    }
}

/// Everything the goals view shows for a profile
#[derive(Debug, Clone, Serialize)]
pub struct GoalPlan {
    /// Maintenance energy (GET / TDEE), kcal/day
    pub maintenance_calories: i64,
    pub bmi: f64,
    pub bmi_category: BmiCategory,
    pub current_weight: f64,
    pub target_weight: f64,
    /// Current minus target weight; zero or negative once the target is reached
    pub weight_to_lose: f64,
    pub suggested_deficit: i64,
    pub target_calories: i64,
    /// Days at the suggested deficit, 0 when there is nothing to lose
    pub days_to_goal: i64,
    pub goal_reached: bool,
}

impl GoalPlan {
    pub fn for_profile(profile: &UserProfile) -> Self {
        let maintenance_calories = total_daily_energy_expenditure(profile);
        let bmi = body_mass_index(profile.weight, profile.height);
        let weight_to_lose = profile.weight - profile.target_weight;

        Self {
            maintenance_calories,
            bmi,
            bmi_category: BmiCategory::from_bmi(bmi),
            current_weight: profile.weight,
            target_weight: profile.target_weight,
            weight_to_lose,
            suggested_deficit: SUGGESTED_DEFICIT,
            target_calories: maintenance_calories - SUGGESTED_DEFICIT,
            days_to_goal: days_to_goal(weight_to_lose),
            goal_reached: weight_to_lose <= 0.0,
        }
    }
}

/// `round(kg × 7700 / 500)`, or 0 when `weight_to_lose <= 0`
pub fn days_to_goal(weight_to_lose: f64) -> i64 {
    if weight_to_lose <= 0.0 {
        return 0;
    }
    (weight_to_lose * KCAL_PER_KG / SUGGESTED_DEFICIT as f64).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityLevel, Gender};

    fn profile(weight: f64, target_weight: f64) -> UserProfile {
        UserProfile {
            name: "Ana".to_string(),
            age: 30,
            gender: Gender::Male,
            height: 175.0,
            weight,
            activity_level: ActivityLevel::ModeratelyActive,
            target_weight,
        }
    }

    #[test]
    fn test_bmi_category_thresholds() {
        assert_eq!(BmiCategory::from_bmi(18.4), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(24.8), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(24.9), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(29.9), BmiCategory::Obese);
        assert_eq!(BmiCategory::from_bmi(0.0), BmiCategory::Underweight);
    }

    #[test]
    fn test_days_to_goal() {
        // 5 kg × 7700 / 500
        assert_eq!(days_to_goal(5.0), 77);
        assert_eq!(days_to_goal(0.3), 5);
        assert_eq!(days_to_goal(0.0), 0);
        assert_eq!(days_to_goal(-2.0), 0);
    }

    #[test]
    fn test_plan_for_profile() {
        let plan = GoalPlan::for_profile(&profile(70.0, 65.0));
        assert_eq!(plan.maintenance_calories, 2556);
        assert_eq!(plan.target_calories, 2056);
        assert_eq!(plan.bmi, 22.9);
        assert_eq!(plan.bmi_category, BmiCategory::Normal);
        assert!((plan.weight_to_lose - 5.0).abs() < 1e-9);
        assert_eq!(plan.days_to_goal, 77);
        assert!(!plan.goal_reached);
    }

    #[test]
    fn test_plan_goal_reached() {
        let plan = GoalPlan::for_profile(&profile(64.0, 65.0));
        assert!(plan.goal_reached);
        assert_eq!(plan.days_to_goal, 0);
    }
}
