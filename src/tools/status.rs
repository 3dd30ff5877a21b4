//! NutriLog Status Tool
//!
//! Provides runtime status information about the NutriLog service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Usage guide for AI assistants
pub const USAGE_INSTRUCTIONS: &str = r#"
# NutriLog Usage Instructions

NutriLog keeps a personal food diary against the Brazilian TACO and IBGE 2025
composition tables. All nutrient values in the table are per 100 g; logged
quantities are grams.

## 1. Profile first

Energy targets need a profile. If `get_profile` returns no profile, ask the
user for name, age, gender (male/female), height (cm), weight (kg), target
weight (kg) and activity level, then call `set_profile`.

| activity_level      | Multiplier | Meaning                         |
|---------------------|------------|---------------------------------|
| sedentary           | 1.2        | little or no exercise           |
| lightly_active      | 1.375      | light exercise 1-3 days/week    |
| moderately_active   | 1.55       | moderate exercise 3-5 days/week |
| very_active         | 1.725      | hard exercise 6-7 days/week     |
| extra_active        | 1.9        | physical job or hard training   |

The daily energy target (GET) is the Mifflin-St Jeor BMR times the multiplier.

## 2. Logging food

1. `search_foods` with part of the name ("arroz", "frango") to get the food id
2. `log_food` with `food_id`, `quantity` in grams and `meal`
   (breakfast, lunch, dinner, snacks)
3. Several items at once: `log_foods_batch`

`date` is optional everywhere (YYYY-MM-DD) and defaults to today.
Entries are snapshots: they keep the nutrient values from the moment they were
logged.

## 3. Photos

`analyze_food_photo` takes a path to a meal photo, identifies the foods and
estimates grams. Items are matched to the table by the text before the first
comma of the identified name. Pass `log_meal` to log every matched item
immediately; otherwise show the preview to the user and log what they confirm.
Unmatched items are never logged.

## 4. Reviewing and fixing

- `get_day`: entries grouped by meal with calorie subtotals
- `daily_summary`: consumed vs target, remaining calories, macros, recent items
- `list_days`: all logged days, newest first
- `remove_logged_food`: drop an entry by id
- `suggest_substitutes` + `substitute_logged_food`: swap an entry for a
  nutritionally similar food; grams, meal and time are kept
  An unknown entry id is reported as `"reason": "not_found"` and changes nothing.

## 5. Goals and reports

- `get_goals`: GET, BMI and category, a 500 kcal/day deficit target and the
  estimated days to reach the target weight
- `generate_nutrition_report`: PDF with a daily calorie chart and macro table
"#;

/// Service status information
#[derive(Debug, Clone, Serialize)]
pub struct NutrilogStatus {
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
    pub vision_configured: bool,
}

/// Status tracker that maintains service start time
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    vision_configured: bool,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf, vision_configured: bool) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            vision_configured,
        }
    }

    pub fn get_status(&self) -> NutrilogStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        NutrilogStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
            vision_configured: self.vision_configured,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_missing_database() {
        let tracker = StatusTracker::new(PathBuf::from("/nonexistent/nutrilog.db"), false);
        let status = tracker.get_status();
        assert_eq!(status.database_size_bytes, None);
        assert_eq!(status.process_id, std::process::id());
        assert!(!status.vision_configured);
    }
}
