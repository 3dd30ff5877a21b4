//! NutriLog MCP Server Implementation
//!
//! Implements the MCP server with all NutriLog tools.

use std::path::PathBuf;
use std::sync::{Arc, MutexGuard};

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::app::AppState;
use crate::models::ProfileInput;
use crate::nutrition::DEFAULT_SUGGESTION_COUNT;
use crate::tools::diary::{self, BatchItem};
use crate::tools::foods::{self, SubstituteBase};
use crate::tools::status::StatusTracker;
use crate::tools::{goals, parse_meal, photo, profile, reports, resolve_date};
use crate::vision::FoodImageAnalyzer;

/// NutriLog MCP Service
#[derive(Clone)]
pub struct NutriLogService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    state: Arc<std::sync::Mutex<AppState>>,
    analyzer: Arc<dyn FoodImageAnalyzer>,
    tool_router: ToolRouter<NutriLogService>,
}

impl NutriLogService {
    pub fn new(
        database_path: PathBuf,
        state: AppState,
        analyzer: Arc<dyn FoodImageAnalyzer>,
        vision_configured: bool,
    ) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path, vision_configured))),
            state: Arc::new(std::sync::Mutex::new(state)),
            analyzer,
            tool_router: Self::tool_router(),
        }
    }

    fn state(&self) -> Result<MutexGuard<'_, AppState>, McpError> {
        self.state
            .lock()
            .map_err(|_| McpError::internal_error("State lock poisoned", None))
    }
}

fn invalid(message: String) -> McpError {
    McpError::invalid_params(message, None)
}

// ============================================================================
// Profile Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetProfileParams {
    pub name: String,
    /// Age in years
    pub age: f64,
    /// "male" or "female"
    pub gender: String,
    /// Height in cm
    pub height: f64,
    /// Current weight in kg
    pub weight: f64,
    /// sedentary, lightly_active, moderately_active, very_active or extra_active
    pub activity_level: String,
    /// Target weight in kg
    pub target_weight: f64,
}

// ============================================================================
// Food Reference Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchFoodsParams {
    pub query: String,
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

fn default_search_limit() -> usize { 20 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetFoodParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SuggestSubstitutesParams {
    /// Reference food to compare against
    pub food_id: Option<i64>,
    /// Logged entry to compare against (used with date)
    pub entry_id: Option<String>,
    /// Date of the logged entry (YYYY-MM-DD, default today)
    pub date: Option<String>,
    #[serde(default = "default_suggestion_count")]
    pub count: usize,
}

fn default_suggestion_count() -> usize { DEFAULT_SUGGESTION_COUNT }

// ============================================================================
// Diary Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogFoodParams {
    pub food_id: i64,
    /// Quantity in grams
    pub quantity: f64,
    /// breakfast, lunch, dinner or snacks
    pub meal: String,
    /// Date (YYYY-MM-DD, default today)
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct BatchItemParams {
    pub food_id: i64,
    /// Quantity in grams
    pub quantity: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogFoodsBatchParams {
    /// breakfast, lunch, dinner or snacks
    pub meal: String,
    pub items: Vec<BatchItemParams>,
    /// Date (YYYY-MM-DD, default today)
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RemoveLoggedFoodParams {
    pub entry_id: String,
    /// Date (YYYY-MM-DD, default today)
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SubstituteLoggedFoodParams {
    pub entry_id: String,
    /// Reference food that replaces the entry
    pub new_food_id: i64,
    /// Date (YYYY-MM-DD, default today)
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DateParams {
    /// Date (YYYY-MM-DD, default today)
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListDaysParams {
    pub limit: Option<usize>,
}

// ============================================================================
// Photo and Report Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AnalyzeFoodPhotoParams {
    /// Full path to a JPEG, PNG or WebP photo of the meal
    pub file_path: String,
    /// When set, matched items are logged into this meal
    pub log_meal: Option<String>,
    /// Date to log into (YYYY-MM-DD, default today)
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GenerateNutritionReportParams {
    /// First day (YYYY-MM-DD)
    pub start_date: String,
    /// Last day (YYYY-MM-DD)
    pub end_date: String,
    /// Full path of the PDF to write
    pub output_path: String,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl NutriLogService {
    // --- Status ---

    #[tool(description = "Get the current status of the NutriLog service including build info, database status, and process information")]
    async fn nutrilog_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        let json = serde_json::to_string_pretty(&status)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get step-by-step instructions for onboarding and logging food. Call this when starting a session or when unsure how to use the tools.")]
    fn usage_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::USAGE_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(USAGE_INSTRUCTIONS)]))
    }

    // --- Profile ---

    #[tool(description = "Create or replace the user profile. Returns the BMR and the daily calorie target (GET).")]
    fn set_profile(&self, Parameters(p): Parameters<SetProfileParams>) -> Result<CallToolResult, McpError> {
        let input = ProfileInput {
            name: p.name, age: p.age, gender: p.gender, height: p.height, weight: p.weight,
            activity_level: p.activity_level, target_weight: p.target_weight,
        };
        let mut state = self.state()?;
        let result = profile::set_profile(&mut state, input).map_err(invalid)?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get the user profile with BMR and daily calorie target, or onboarding guidance when none exists")]
    fn get_profile(&self) -> Result<CallToolResult, McpError> {
        let state = self.state()?;
        let result = profile::get_profile(&state);
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get BMI, maintenance calories, a suggested deficit and the estimated days to reach the target weight")]
    fn get_goals(&self) -> Result<CallToolResult, McpError> {
        let state = self.state()?;
        let result = goals::get_goals(&state).map_err(invalid)?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Food Reference ---

    #[tool(description = "Search the food composition table by name (case-insensitive substring)")]
    fn search_foods(&self, Parameters(p): Parameters<SearchFoodsParams>) -> Result<CallToolResult, McpError> {
        let state = self.state()?;
        let result = foods::search_foods(&state, &p.query, p.limit);
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get a reference food with its per-100g macronutrients and micronutrients")]
    fn get_food(&self, Parameters(p): Parameters<GetFoodParams>) -> Result<CallToolResult, McpError> {
        let state = self.state()?;
        let json = match foods::get_food(&state, p.id) {
            Some(food) => serde_json::to_string_pretty(&food),
            None => Ok(format!(r#"{{"error": "Food not found", "id": {}}}"#, p.id)),
        }.map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Suggest nutritionally similar foods for a reference food (food_id) or for a logged entry (entry_id and date). Lower score is more similar.")]
    fn suggest_substitutes(&self, Parameters(p): Parameters<SuggestSubstitutesParams>) -> Result<CallToolResult, McpError> {
        let base = match (p.food_id, p.entry_id) {
            (Some(id), None) => SubstituteBase::Food(id),
            (None, Some(entry_id)) => SubstituteBase::Entry {
                date: resolve_date(p.date.as_deref()).map_err(invalid)?,
                entry_id,
            },
            _ => return Err(invalid("Provide exactly one of food_id or entry_id".to_string())),
        };
        let state = self.state()?;
        let result = foods::suggest_substitutes(&state, base, p.count).map_err(invalid)?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Diary ---

    #[tool(description = "Log a reference food into a meal. The food's nutrition is copied into the entry at logging time.")]
    fn log_food(&self, Parameters(p): Parameters<LogFoodParams>) -> Result<CallToolResult, McpError> {
        let date = resolve_date(p.date.as_deref()).map_err(invalid)?;
        let meal = parse_meal(&p.meal).map_err(invalid)?;
        let mut state = self.state()?;
        let result = diary::log_food(&mut state, date, p.food_id, p.quantity, meal).map_err(invalid)?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Log several foods into one meal. Nothing is logged if any item is invalid.")]
    fn log_foods_batch(&self, Parameters(p): Parameters<LogFoodsBatchParams>) -> Result<CallToolResult, McpError> {
        let date = resolve_date(p.date.as_deref()).map_err(invalid)?;
        let meal = parse_meal(&p.meal).map_err(invalid)?;
        let items: Vec<BatchItem> = p.items.into_iter()
            .map(|i| BatchItem { food_id: i.food_id, quantity: i.quantity })
            .collect();
        let mut state = self.state()?;
        let result = diary::log_foods_batch(&mut state, date, meal, &items).map_err(invalid)?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Remove a logged entry by id. Reports not_found when the entry does not exist on that date.")]
    fn remove_logged_food(&self, Parameters(p): Parameters<RemoveLoggedFoodParams>) -> Result<CallToolResult, McpError> {
        let date = resolve_date(p.date.as_deref()).map_err(invalid)?;
        let mut state = self.state()?;
        let result = diary::remove_logged_food(&mut state, date, &p.entry_id);
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Replace a logged entry with another reference food, keeping its quantity, meal and time. Use suggest_substitutes to find candidates.")]
    fn substitute_logged_food(&self, Parameters(p): Parameters<SubstituteLoggedFoodParams>) -> Result<CallToolResult, McpError> {
        let date = resolve_date(p.date.as_deref()).map_err(invalid)?;
        let mut state = self.state()?;
        let result = diary::substitute_logged_food(&mut state, date, &p.entry_id, p.new_food_id).map_err(invalid)?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get a day's entries grouped by meal with per-meal calories and day totals")]
    fn get_day(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let date = resolve_date(p.date.as_deref()).map_err(invalid)?;
        let state = self.state()?;
        let result = diary::get_day(&state, date);
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "List logged days, newest first, with entry counts and calorie totals")]
    fn list_days(&self, Parameters(p): Parameters<ListDaysParams>) -> Result<CallToolResult, McpError> {
        let state = self.state()?;
        let result = diary::list_days(&state, p.limit);
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get the daily dashboard: target, consumed, remaining calories, macros and the most recent entries")]
    fn daily_summary(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let date = resolve_date(p.date.as_deref()).map_err(invalid)?;
        let state = self.state()?;
        let result = diary::daily_summary(&state, date).map_err(invalid)?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Photo ---

    #[tool(description = "Identify foods and portion sizes in a meal photo and match them to the reference table. Pass log_meal to log the matched items.")]
    async fn analyze_food_photo(&self, Parameters(p): Parameters<AnalyzeFoodPhotoParams>) -> Result<CallToolResult, McpError> {
        let log_into = match p.log_meal.as_deref() {
            Some(meal) => Some((
                resolve_date(p.date.as_deref()).map_err(invalid)?,
                parse_meal(meal).map_err(invalid)?,
            )),
            None => None,
        };
        let result = photo::analyze_food_photo(&self.state, self.analyzer.as_ref(), &p.file_path, log_into)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Reports ---

    #[tool(description = "Generate a PDF nutrition report for a date range: daily intake table against the target and a calorie trend chart")]
    fn generate_nutrition_report(&self, Parameters(p): Parameters<GenerateNutritionReportParams>) -> Result<CallToolResult, McpError> {
        let start = resolve_date(Some(&p.start_date)).map_err(invalid)?;
        let end = resolve_date(Some(&p.end_date)).map_err(invalid)?;
        let state = self.state()?;
        let result = reports::generate_nutrition_report(&state, start, end, &p.output_path)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for NutriLogService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutrilog".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("NutriLog".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "NutriLog - Nutrition diary with calorie targets and food substitution. \
                 IMPORTANT: Call usage_instructions first. Without a profile, collect the onboarding data and call set_profile. \
                 Profile: set_profile/get_profile/get_goals. \
                 Foods: search_foods/get_food/suggest_substitutes. \
                 Diary: log_food/log_foods_batch/remove_logged_food/substitute_logged_food, get_day/list_days/daily_summary. \
                 Photo: analyze_food_photo (preview, or log with log_meal). \
                 Reports: generate_nutrition_report."
                    .into(),
            ),
        }
    }
}
