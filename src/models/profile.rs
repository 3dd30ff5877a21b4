//! User profile model
//!
//! The single user profile that drives energy targets, plus the profile store.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{DbError, DbResult};

/// Sex used to pick the BMR formula branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Some(Gender::Male),
            "female" | "f" => Some(Gender::Female),
            _ => None,
        }
    }
}

/// Activity level with its fixed TDEE multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    LightlyActive,
    /// Moderate exercise 3-5 days/week
    ModeratelyActive,
    /// Hard exercise 6-7 days/week
    VeryActive,
    /// Physical job or very hard training
    ExtraActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::ExtraActive,
    ];

    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::LightlyActive => "lightly_active",
            ActivityLevel::ModeratelyActive => "moderately_active",
            ActivityLevel::VeryActive => "very_active",
            ActivityLevel::ExtraActive => "extra_active",
        }
    }

    /// Map a stored multiplier back to its level
    pub fn from_multiplier(value: f64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| (level.multiplier() - value).abs() < 1e-9)
    }

    /// Parse either the snake_case key or the multiplier ("1.55")
    pub fn from_str(s: &str) -> Option<Self> {
        let key = s.trim().to_lowercase().replace(['-', ' '], "_");
        match key.as_str() {
            "sedentary" => Some(ActivityLevel::Sedentary),
            "lightly_active" | "light" => Some(ActivityLevel::LightlyActive),
            "moderately_active" | "moderate" => Some(ActivityLevel::ModeratelyActive),
            "very_active" => Some(ActivityLevel::VeryActive),
            "extra_active" | "extremely_active" => Some(ActivityLevel::ExtraActive),
            other => other.parse::<f64>().ok().and_then(Self::from_multiplier),
        }
    }
}

/// A complete, validated user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub height: f64, // cm
    pub weight: f64, // kg
    pub activity_level: ActivityLevel,
    pub target_weight: f64, // kg
}

/// Why a profile input was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("name cannot be empty")]
    EmptyName,

    #[error("{field} must be a positive number, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("unknown gender '{0}' (expected male or female)")]
    UnknownGender(String),

    #[error("unknown activity level '{0}' (expected sedentary, lightly_active, moderately_active, very_active or extra_active)")]
    UnknownActivityLevel(String),
}

/// Raw onboarding input, validated into a [`UserProfile`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileInput {
    pub name: String,
    pub age: f64,
    pub gender: String,
    pub height: f64,
    pub weight: f64,
    pub activity_level: String,
    pub target_weight: f64,
}

fn positive(field: &'static str, value: f64) -> Result<f64, ProfileError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ProfileError::NotPositive { field, value })
    }
}

impl ProfileInput {
    /// Check every field; the first problem found is returned
    pub fn validate(&self) -> Result<UserProfile, ProfileError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ProfileError::EmptyName);
        }

        let age = positive("age", self.age)?;
        let gender = Gender::from_str(&self.gender)
            .ok_or_else(|| ProfileError::UnknownGender(self.gender.clone()))?;
        let height = positive("height", self.height)?;
        let weight = positive("weight", self.weight)?;
        let activity_level = ActivityLevel::from_str(&self.activity_level)
            .ok_or_else(|| ProfileError::UnknownActivityLevel(self.activity_level.clone()))?;
        let target_weight = positive("target_weight", self.target_weight)?;

        // Ages are whole years; 30.7 counts as 30
        let age = age.trunc() as u32;
        if age == 0 {
            return Err(ProfileError::NotPositive { field: "age", value: self.age });
        }

        Ok(UserProfile {
            name: name.to_string(),
            age,
            gender,
            height,
            weight,
            activity_level,
            target_weight,
        })
    }
}

impl UserProfile {
    fn from_row(row: &Row) -> DbResult<Self> {
        let gender: String = row.get("gender")?;
        let activity: f64 = row.get("activity_level")?;

        Ok(Self {
            name: row.get("name")?,
            age: row.get("age")?,
            gender: Gender::from_str(&gender).ok_or(DbError::Corrupt {
                column: "user_profile.gender",
                value: gender,
            })?,
            height: row.get("height")?,
            weight: row.get("weight")?,
            activity_level: ActivityLevel::from_multiplier(activity).ok_or(DbError::Corrupt {
                column: "user_profile.activity_level",
                value: activity.to_string(),
            })?,
            target_weight: row.get("target_weight")?,
        })
    }

    /// Load the stored profile. `None` means onboarding has not happened yet.
    pub fn load(conn: &Connection) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM user_profile WHERE id = 1")?;
        let mut rows = stmt.query([])?;

        match rows.next()? {
            Some(row) => Ok(Some(Self::from_row(row)?)),
            None => Ok(None),
        }
    }

    /// Store the profile, replacing any previous one
    pub fn save(&self, conn: &Connection) -> DbResult<()> {
        conn.execute(
            r#"
            INSERT INTO user_profile (id, name, age, gender, height, weight, activity_level, target_weight)
            VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                age = excluded.age,
                gender = excluded.gender,
                height = excluded.height,
                weight = excluded.weight,
                activity_level = excluded.activity_level,
                target_weight = excluded.target_weight,
                updated_at = datetime('now')
            "#,
            params![
                self.name,
                self.age,
                self.gender.as_str(),
                self.height,
                self.weight,
                self.activity_level.multiplier(),
                self.target_weight,
            ],
        )?;
        Ok(())
    }
}
