//! Daily log model
//!
//! Calendar date → ordered sequence of logged foods, plus the log store.
//!
//! Each day's sequence sits behind an `Arc`. Producing a new log that changes
//! one day clones the map of pointers only, so every untouched day stays
//! pointer-equal to the previous version. Consumers can compare days with
//! [`DailyLog::shares_day`] to detect what changed.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, Row};

use crate::db::{DbError, DbResult};
use super::{FoodSource, LoggedFoodEntry, Macros, MealType, Micronutrients};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default)]
pub struct DailyLog {
    days: BTreeMap<NaiveDate, Arc<Vec<LoggedFoodEntry>>>,
}

impl DailyLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries logged on `date`, in insertion order (empty if none)
    pub fn day(&self, date: NaiveDate) -> &[LoggedFoodEntry] {
        self.days.get(&date).map(|d| d.as_slice()).unwrap_or(&[])
    }

    pub fn contains_day(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }

    /// A new log where `date` holds `entries`; every other day is shared
    pub fn with_day(&self, date: NaiveDate, entries: Vec<LoggedFoodEntry>) -> Self {
        let mut days = self.days.clone();
        days.insert(date, Arc::new(entries));
        Self { days }
    }

    /// A new log without `date`; every other day is shared
    pub fn without_day(&self, date: NaiveDate) -> Self {
        let mut days = self.days.clone();
        days.remove(&date);
        Self { days }
    }

    /// True when both logs hold the very same sequence for `date`
    pub fn shares_day(&self, other: &DailyLog, date: NaiveDate) -> bool {
        match (self.days.get(&date), other.days.get(&date)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Dates with a sequence, newest first
    pub fn dates_newest_first(&self) -> Vec<NaiveDate> {
        self.days.keys().rev().copied().collect()
    }

    /// Iterate days oldest first
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &[LoggedFoodEntry])> {
        self.days.iter().map(|(date, entries)| (*date, entries.as_slice()))
    }

    /// Number of days with a sequence
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Find an entry by id on a given day
    pub fn find_entry(&self, date: NaiveDate, entry_id: &str) -> Option<&LoggedFoodEntry> {
        self.day(date).iter().find(|e| e.id == entry_id)
    }

    // ------------------------------------------------------------------
    // Log store
    // ------------------------------------------------------------------

    /// Load the whole log
    pub fn load(conn: &Connection) -> DbResult<Self> {
        let mut stmt = conn.prepare("SELECT * FROM logged_foods ORDER BY date ASC, position ASC")?;
        let mut rows = stmt.query([])?;

        let mut grouped: BTreeMap<NaiveDate, Vec<LoggedFoodEntry>> = BTreeMap::new();
        while let Some(row) = rows.next()? {
            let (date, entry) = entry_from_row(row)?;
            grouped.entry(date).or_default().push(entry);
        }

        Ok(Self {
            days: grouped.into_iter().map(|(d, e)| (d, Arc::new(e))).collect(),
        })
    }

    /// Rewrite the stored sequence for one day; a day absent from the log
    /// ends up with no stored rows
    pub fn save_day(&self, conn: &mut Connection, date: NaiveDate) -> DbResult<()> {
        let date_str = date.format(DATE_FORMAT).to_string();
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM logged_foods WHERE date = ?1", [&date_str])?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO logged_foods (
                    id, date, position, food_id, name, source,
                    calories, protein, carbs, fat,
                    fiber, sodium, calcium, iron, zinc,
                    vitamin_a, vitamin_c, vitamin_d, vitamin_e, vitamin_k,
                    quantity, meal, timestamp
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                          ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23)
                "#,
            )?;

            for (position, entry) in self.day(date).iter().enumerate() {
                let m = &entry.micros;
                stmt.execute(params![
                    entry.id,
                    date_str,
                    position as i64,
                    entry.food_id,
                    entry.name,
                    entry.source.as_str(),
                    entry.macros.calories,
                    entry.macros.protein,
                    entry.macros.carbs,
                    entry.macros.fat,
                    m.fiber,
                    m.sodium,
                    m.calcium,
                    m.iron,
                    m.zinc,
                    m.vitamin_a,
                    m.vitamin_c,
                    m.vitamin_d,
                    m.vitamin_e,
                    m.vitamin_k,
                    entry.quantity,
                    entry.meal.as_str(),
                    entry.timestamp.to_rfc3339(),
                ])?;
            }
        }

        tx.commit()?;
        Ok(())
    }
}

fn entry_from_row(row: &Row) -> DbResult<(NaiveDate, LoggedFoodEntry)> {
    let date: String = row.get("date")?;
    let source: String = row.get("source")?;
    let meal: String = row.get("meal")?;
    let timestamp: String = row.get("timestamp")?;

    let date = NaiveDate::parse_from_str(&date, DATE_FORMAT)
        .map_err(|_| DbError::Corrupt { column: "logged_foods.date", value: date.clone() })?;

    let entry = LoggedFoodEntry {
        id: row.get("id")?,
        food_id: row.get("food_id")?,
        name: row.get("name")?,
        source: FoodSource::from_str(&source)
            .ok_or(DbError::Corrupt { column: "logged_foods.source", value: source })?,
        macros: Macros {
            calories: row.get("calories")?,
            protein: row.get("protein")?,
            carbs: row.get("carbs")?,
            fat: row.get("fat")?,
        },
        micros: Micronutrients {
            fiber: row.get("fiber")?,
            sodium: row.get("sodium")?,
            calcium: row.get("calcium")?,
            iron: row.get("iron")?,
            zinc: row.get("zinc")?,
            vitamin_a: row.get("vitamin_a")?,
            vitamin_c: row.get("vitamin_c")?,
            vitamin_d: row.get("vitamin_d")?,
            vitamin_e: row.get("vitamin_e")?,
            vitamin_k: row.get("vitamin_k")?,
        },
        quantity: row.get("quantity")?,
        meal: MealType::from_str(&meal)
            .ok_or(DbError::Corrupt { column: "logged_foods.meal", value: meal })?,
        timestamp: DateTime::parse_from_rfc3339(&timestamp)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|_| DbError::Corrupt { column: "logged_foods.timestamp", value: timestamp.clone() })?,
    };

    Ok((date, entry))
}
