//! Goals MCP Tool

use serde::Serialize;

use crate::app::AppState;
use crate::nutrition::GoalPlan;

use super::profile::ONBOARDING_HINT;

#[derive(Debug, Serialize)]
pub struct GoalsResponse {
    #[serde(flatten)]
    pub plan: GoalPlan,
    pub bmi_label: &'static str,
    pub message: String,
}

pub fn get_goals(state: &AppState) -> Result<GoalsResponse, String> {
    let profile = state.profile().ok_or_else(|| ONBOARDING_HINT.to_string())?;
    let plan = GoalPlan::for_profile(profile);

    let message = if plan.goal_reached {
        "Target weight reached.".to_string()
    } else {
        format!(
            "Eating {} kcal/day ({} kcal under maintenance) reaches {} kg in about {} days.",
            plan.target_calories, plan.suggested_deficit, plan.target_weight, plan.days_to_goal
        )
    };

    Ok(GoalsResponse {
        bmi_label: plan.bmi_category.label(),
        plan,
        message,
    })
}
