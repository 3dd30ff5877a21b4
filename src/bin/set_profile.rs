//! Utility to set the user profile in the database
//!
//! Usage: set_profile <name> <age> <gender> <height_cm> <weight_kg> <activity_level> <target_weight_kg>

use nutrilog::config::Config;
use nutrilog::models::ProfileInput;
use nutrilog::nutrition::{basal_metabolic_rate, total_daily_energy_expenditure};

const USAGE: &str =
    "usage: set_profile <name> <age> <gender> <height_cm> <weight_kg> <activity_level> <target_weight_kg>";

fn number(value: &str, field: &str) -> Result<f64, String> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("{} must be a number, got '{}'", field, value))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let [name, age, gender, height, weight, activity_level, target_weight] = args.as_slice() else {
        return Err(USAGE.into());
    };

    let input = ProfileInput {
        name: name.clone(),
        age: number(age, "age")?,
        gender: gender.clone(),
        height: number(height, "height")?,
        weight: number(weight, "weight")?,
        activity_level: activity_level.clone(),
        target_weight: number(target_weight, "target_weight")?,
    };
    let profile = input.validate()?;

    let db_path = Config::from_env()?.database_path;
    println!("Database path: {}", db_path.display());
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = nutrilog::db::Database::new(&db_path)?;

    // Run migrations
    database.with_conn(|conn| {
        nutrilog::db::migrations::run_migrations(conn)?;
        profile.save(conn)?;
        Ok(())
    })?;

    println!("Profile set:");
    println!("  Name: {}", profile.name);
    println!("  Age: {}", profile.age);
    println!("  Gender: {}", profile.gender.as_str());
    println!("  Height: {} cm", profile.height);
    println!("  Weight: {} kg (target {} kg)", profile.weight, profile.target_weight);
    println!("  Activity: {}", profile.activity_level.as_str());
    println!("  BMR: {:.2} kcal", basal_metabolic_rate(&profile));
    println!("  Daily target (GET): {} kcal", total_daily_energy_expenditure(&profile));

    Ok(())
}
