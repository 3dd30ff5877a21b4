//! Profile MCP Tools
//!
//! Onboarding and profile lookup.

use serde::Serialize;

use crate::app::AppState;
use crate::models::{ProfileInput, UserProfile};
use crate::nutrition::{basal_metabolic_rate, total_daily_energy_expenditure};

/// Profile together with the energy figures derived from it
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: UserProfile,
    pub activity_multiplier: f64,
    pub basal_metabolic_rate: f64,
    pub daily_target_calories: i64,
}

impl ProfileResponse {
    fn from_profile(profile: &UserProfile) -> Self {
        Self {
            profile: profile.clone(),
            activity_multiplier: profile.activity_level.multiplier(),
            basal_metabolic_rate: basal_metabolic_rate(profile),
            daily_target_calories: total_daily_energy_expenditure(profile),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GetProfileResponse {
    pub onboarded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Validate and store a profile, replacing any previous one
pub fn set_profile(state: &mut AppState, input: ProfileInput) -> Result<ProfileResponse, String> {
    let profile = input.validate().map_err(|e| format!("Invalid profile: {}", e))?;
    let response = ProfileResponse::from_profile(&profile);
    state.set_profile(profile);
    Ok(response)
}

pub fn get_profile(state: &AppState) -> GetProfileResponse {
    match state.profile() {
        Some(profile) => GetProfileResponse {
            onboarded: true,
            profile: Some(ProfileResponse::from_profile(profile)),
            message: None,
        },
        None => GetProfileResponse {
            onboarded: false,
            profile: None,
            message: Some(ONBOARDING_HINT.to_string()),
        },
    }
}

/// Shown wherever a profile is required but missing
pub const ONBOARDING_HINT: &str =
    "No profile yet. Ask for name, age, gender, height (cm), weight (kg), target weight (kg) and activity level, then call set_profile.";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::temp_database;

    fn input() -> ProfileInput {
        ProfileInput {
            name: " Ana ".to_string(),
            age: 30.0,
            gender: "male".to_string(),
            height: 175.0,
            weight: 70.0,
            activity_level: "moderately_active".to_string(),
            target_weight: 65.0,
        }
    }

    #[test]
    fn test_onboarding_flow() {
        let (_dir, database) = temp_database();
        let mut state = AppState::load(database).unwrap();

        let before = get_profile(&state);
        assert!(!before.onboarded);
        assert_eq!(before.message.as_deref(), Some(ONBOARDING_HINT));

        let response = set_profile(&mut state, input()).unwrap();
        assert_eq!(response.profile.name, "Ana");
        assert!((response.basal_metabolic_rate - 1648.75).abs() < 1e-9);
        assert_eq!(response.activity_multiplier, 1.55);
        assert_eq!(response.daily_target_calories, 2556);

        let after = get_profile(&state);
        assert!(after.onboarded);
        assert!(after.message.is_none());
        assert_eq!(after.profile.map(|p| p.daily_target_calories), Some(2556));
    }

    #[test]
    fn test_invalid_profile_is_rejected() {
        let (_dir, database) = temp_database();
        let mut state = AppState::load(database).unwrap();

        let err = set_profile(&mut state, ProfileInput { height: 0.0, ..input() }).unwrap_err();
        assert!(err.contains("height"));
        assert!(state.profile().is_none());
    }
}
