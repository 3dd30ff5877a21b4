//! Energy and body-metric calculations
//!
//! BMR uses the Mifflin-St Jeor equation (1990):
//! `BMR = 10 × weight_kg + 6.25 × height_cm - 5 × age + offset`,
//! with offset +5 for men and -161 for women. Total daily energy expenditure
//! (GET / TDEE) is BMR times the activity multiplier.

use crate::models::{Gender, UserProfile};

const MALE_OFFSET: f64 = 5.0;
const FEMALE_OFFSET: f64 = -161.0;

/// Basal metabolic rate in kcal/day
pub fn basal_metabolic_rate(profile: &UserProfile) -> f64 {
    let offset = match profile.gender {
        Gender::Male => MALE_OFFSET,
        Gender::Female => FEMALE_OFFSET,
    };
    10.0 * profile.weight + 6.25 * profile.height - 5.0 * f64::from(profile.age) + offset
}

/// Total daily energy expenditure in whole kcal/day
pub fn total_daily_energy_expenditure(profile: &UserProfile) -> i64 {
    (basal_metabolic_rate(profile) * profile.activity_level.multiplier()).round() as i64
}

/// Body mass index rounded to one decimal.
///
/// Returns `0.0` when `height_cm <= 0`; callers must not show that as a BMI.
pub fn body_mass_index(weight_kg: f64, height_cm: f64) -> f64 {
    if height_cm <= 0.0 {
        return 0.0;
    }
    let height_m = height_cm / 100.0;
    round_to_tenth(weight_kg / (height_m * height_m))
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivityLevel;

    fn profile(gender: Gender, activity_level: ActivityLevel) -> UserProfile {
        UserProfile {
            name: "Test".to_string(),
            age: 30,
            gender,
            height: 175.0,
            weight: 70.0,
            activity_level,
            target_weight: 65.0,
        }
    }

    #[test]
    fn test_bmr_male() {
        let p = profile(Gender::Male, ActivityLevel::ModeratelyActive);
        // 700 + 1093.75 - 150 + 5
        assert!((basal_metabolic_rate(&p) - 1648.75).abs() < 1e-9);
    }

    #[test]
    fn test_bmr_female() {
        let p = profile(Gender::Female, ActivityLevel::ModeratelyActive);
        // 700 + 1093.75 - 150 - 161
        assert!((basal_metabolic_rate(&p) - 1482.75).abs() < 1e-9);
    }

    #[test]
    fn test_bmr_formula_holds_across_profiles() {
        for (w, h, a) in [(50.0, 150.0, 18u32), (92.3, 188.0, 45), (61.0, 163.5, 71)] {
            let mut p = profile(Gender::Male, ActivityLevel::Sedentary);
            p.weight = w;
            p.height = h;
            p.age = a;
            let male = 10.0 * w + 6.25 * h - 5.0 * a as f64 + 5.0;
            assert!((basal_metabolic_rate(&p) - male).abs() < 1e-9);

            p.gender = Gender::Female;
            assert!((basal_metabolic_rate(&p) - (male - 166.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_tdee_end_to_end() {
        let p = profile(Gender::Male, ActivityLevel::ModeratelyActive);
        // 1648.75 * 1.55 = 2555.5625
        assert_eq!(total_daily_energy_expenditure(&p), 2556);
    }

    #[test]
    fn test_tdee_from_fractional_bmr() {
        let mut p = profile(Gender::Male, ActivityLevel::ModeratelyActive);
        p.height = 178.0;
        // BMR 1667.5, 1667.5 * 1.55 = 2584.625
        assert!((basal_metabolic_rate(&p) - 1667.5).abs() < 1e-9);
        assert_eq!(total_daily_energy_expenditure(&p), 2585);
    }

    #[test]
    fn test_tdee_monotonic_in_activity() {
        let values: Vec<i64> = ActivityLevel::ALL
            .iter()
            .map(|level| total_daily_energy_expenditure(&profile(Gender::Female, *level)))
            .collect();
        assert!(values.windows(2).all(|w| w[0] < w[1]), "{:?}", values);
    }

    #[test]
    fn test_bmi() {
        assert_eq!(body_mass_index(70.0, 175.0), 22.9);
        assert_eq!(body_mass_index(50.0, 160.0), 19.5);
    }

    #[test]
    fn test_bmi_non_positive_height() {
        assert_eq!(body_mass_index(70.0, 0.0), 0.0);
        assert_eq!(body_mass_index(120.0, -5.0), 0.0);
    }
}
