//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Get the schema version currently applied to the database
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- USER PROFILE
        -- Single row (id = 1), replaced wholesale on edit
        -- ============================================
        CREATE TABLE user_profile (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            name TEXT NOT NULL,
            age INTEGER NOT NULL CHECK (age > 0),
            gender TEXT NOT NULL CHECK (gender IN ('male', 'female')),
            height REAL NOT NULL CHECK (height > 0),          -- cm
            weight REAL NOT NULL CHECK (weight > 0),          -- kg
            activity_level REAL NOT NULL,                     -- multiplier
            target_weight REAL NOT NULL CHECK (target_weight > 0),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- LOGGED FOODS
        -- Nutrient snapshot per logging action, ordered per day
        -- ============================================
        CREATE TABLE logged_foods (
            id TEXT PRIMARY KEY,
            date TEXT NOT NULL,                  -- YYYY-MM-DD
            position INTEGER NOT NULL,           -- insertion order within the day
            food_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            source TEXT NOT NULL,

            -- Per 100g snapshot
            calories REAL NOT NULL,
            protein REAL NOT NULL,
            carbs REAL NOT NULL,
            fat REAL NOT NULL,

            -- Optional micronutrients (NULL = unknown)
            fiber REAL,
            sodium REAL,
            calcium REAL,
            iron REAL,
            zinc REAL,
            vitamin_a REAL,
            vitamin_c REAL,
            vitamin_d REAL,
            vitamin_e REAL,
            vitamin_k REAL,

            quantity REAL NOT NULL CHECK (quantity > 0),   -- grams
            meal TEXT NOT NULL CHECK (meal IN ('breakfast', 'lunch', 'dinner', 'snacks')),
            timestamp TEXT NOT NULL              -- RFC 3339
        );

        CREATE INDEX idx_logged_foods_date ON logged_foods(date, position);
        "#,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }
}
