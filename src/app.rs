//! Application state
//!
//! Owns the profile, the daily log, the reference table and the name matcher
//! for one session. Core operations run in memory first; the touched day or
//! the profile is then written through to SQLite. A failed write is logged
//! and otherwise ignored, so the in-memory state stays authoritative until
//! the next restart.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use tracing::{info, warn};

use crate::db::{Database, DbResult};
use crate::diary::{self, Mutation};
use crate::models::{DailyLog, FoodRecord, LoggedFoodEntry, MealType, UserProfile};
use crate::nutrition::total_daily_energy_expenditure;
use crate::reference::{FirstSegmentMatcher, FoodMatcher, FoodTable};

#[derive(Debug, Error, PartialEq)]
pub enum StateError {
    #[error("no profile yet; call set_profile first")]
    NoProfile,

    #[error("food {0} is not in the reference table")]
    UnknownFood(i64),

    #[error("quantity must be a positive number of grams, got {0}")]
    InvalidQuantity(f64),
}

pub struct AppState {
    database: Database,
    profile: Option<UserProfile>,
    log: DailyLog,
    table: FoodTable,
    matcher: Box<dyn FoodMatcher>,
}

impl AppState {
    /// Load the stored profile and log
    pub fn load(database: Database) -> DbResult<Self> {
        let (profile, log) = database.with_conn(|conn| {
            Ok((UserProfile::load(conn)?, DailyLog::load(conn)?))
        })?;

        info!(
            has_profile = profile.is_some(),
            days = log.len(),
            "loaded diary state"
        );

        Ok(Self {
            database,
            profile,
            log,
            table: FoodTable::builtin(),
            matcher: Box::new(FirstSegmentMatcher),
        })
    }

    pub fn with_matcher(mut self, matcher: Box<dyn FoodMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn log(&self) -> &DailyLog {
        &self.log
    }

    pub fn table(&self) -> &FoodTable {
        &self.table
    }

    pub fn matcher(&self) -> &dyn FoodMatcher {
        self.matcher.as_ref()
    }

    /// GET of the current profile
    pub fn daily_target(&self) -> Result<i64, StateError> {
        self.profile
            .as_ref()
            .map(total_daily_energy_expenditure)
            .ok_or(StateError::NoProfile)
    }

    fn food(&self, food_id: i64) -> Result<FoodRecord, StateError> {
        self.table.get(food_id).cloned().ok_or(StateError::UnknownFood(food_id))
    }

    /// Replace the profile wholesale
    pub fn set_profile(&mut self, profile: UserProfile) {
        if let Err(e) = self.database.with_conn(|conn| profile.save(conn)) {
            warn!(error = %e, "failed to persist profile");
        }
        info!(name = %profile.name, "profile updated");
        self.profile = Some(profile);
    }

    pub fn log_food(
        &mut self,
        date: NaiveDate,
        food_id: i64,
        quantity: f64,
        meal: MealType,
        logged_at: DateTime<Utc>,
    ) -> Result<LoggedFoodEntry, StateError> {
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(StateError::InvalidQuantity(quantity));
        }
        let food = self.food(food_id)?;

        let (log, entry) = diary::append(&self.log, date, &food, quantity, meal, logged_at);
        self.install(date, log);
        Ok(entry)
    }

    pub fn remove_entry(&mut self, date: NaiveDate, entry_id: &str) -> Mutation {
        let (log, outcome) = diary::remove(&self.log, date, entry_id);
        if outcome.is_applied() {
            self.install(date, log);
        }
        outcome
    }

    pub fn substitute_entry(
        &mut self,
        date: NaiveDate,
        entry_id: &str,
        new_food_id: i64,
    ) -> Result<Mutation, StateError> {
        let food = self.food(new_food_id)?;
        let (log, outcome) = diary::substitute(&self.log, date, entry_id, &food);
        if outcome.is_applied() {
            self.install(date, log);
        }
        Ok(outcome)
    }

    fn install(&mut self, date: NaiveDate, log: DailyLog) {
        self.log = log;
        if let Err(e) = self.database.with_conn_mut(|conn| self.log.save_day(conn, date)) {
            warn!(%date, error = %e, "failed to persist day");
        }
    }
}
