//! Data models
//!
//! Reference foods, the user profile, logged food snapshots and the daily log.

mod daily_log;
mod food;
mod logged_food;
mod nutrition;
mod profile;

pub use daily_log::DailyLog;
pub use food::{FoodRecord, FoodSource, Micronutrients};
pub use logged_food::{LoggedFoodEntry, MealType};
pub use nutrition::Macros;
pub use profile::{ActivityLevel, Gender, ProfileError, ProfileInput, UserProfile};
