/// Database module for the offerings a student has saved

mod types;

pub use types::DbOffering;

use rusqlite::{params, Connection};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::error::{Result, ScheduleError};
use crate::types::{Offering, Weekday};
use types::OFFERING_COLUMNS;

const SCHEMA_SQL: &str = include_str!("../../../../sql/init_offerings.sql");

/// Append-only store of saved offerings.
pub struct ScheduleDbManager {
    db: Mutex<Connection>,
}

impl ScheduleDbManager {
    /// Opens (or creates) the database at `db_path` and initializes the schema.
    /// `":memory:"` gives a private in-memory database.
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        conn.execute_batch(SCHEMA_SQL)?;

        info!(path = %db_path, "Opened offerings database");

        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    pub fn in_memory() -> Result<Self> {
        Self::new(":memory:")
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.db.lock().map_err(|_| ScheduleError::Store {
            message: "database lock poisoned".to_string(),
        })
    }

    /// Saves an offering and returns it with its new row id.
    pub fn insert_offering(&self, offering: &Offering) -> Result<Offering> {
        let db = self.lock()?;

        let recitation = offering.recitation.as_ref();
        db.execute(
            "INSERT INTO offerings (
                subject, course_number, lecture_start, lecture_end, lecture_days,
                recitation_start, recitation_end, recitation_days, search_index, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, datetime('now'))",
            params![
                offering.subject,
                offering.course_number,
                offering.lecture.start,
                offering.lecture.end,
                offering.lecture.days.to_string(),
                recitation.map(|r| r.start),
                recitation.map(|r| r.end),
                recitation.map(|r| r.days.to_string()),
                offering.index as i64,
            ],
        )?;

        let id = db.last_insert_rowid();
        debug!(offering_id = id, course = %offering.course_label(), "Inserted offering");

        Ok(Offering {
            id: Some(id),
            ..offering.clone()
        })
    }

    /// Gets every saved offering in insertion order
    pub fn all_offerings(&self) -> Result<Vec<Offering>> {
        let db = self.lock()?;
        let mut stmt = db.prepare(&format!(
            "SELECT {} FROM offerings ORDER BY offering_id",
            OFFERING_COLUMNS
        ))?;

        let offerings = stmt
            .query_map([], DbOffering::from_row)?
            .map(|row| row.and_then(DbOffering::into_offering))
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(offerings)
    }

    /// Gets the offerings listed under `day` in the weekly view: lecture
    /// matches first, then offerings whose recitation alone meets that day.
    ///
    /// Day strings are stored in canonical form, so a substring test on the
    /// two-letter code is exact.
    pub fn offerings_for_day(&self, day: Weekday) -> Result<Vec<Offering>> {
        let db = self.lock()?;
        let mut stmt = db.prepare(&format!(
            "SELECT {} FROM offerings
             WHERE instr(lecture_days, ?1) > 0
                OR (instr(IFNULL(recitation_days, ''), ?1) > 0 AND instr(lecture_days, ?1) = 0)
             ORDER BY instr(lecture_days, ?1) = 0, offering_id",
            OFFERING_COLUMNS
        ))?;

        let offerings = stmt
            .query_map([day.code()], DbOffering::from_row)?
            .map(|row| row.and_then(DbOffering::into_offering))
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(offerings)
    }

    pub fn count(&self) -> Result<usize> {
        let db = self.lock()?;
        let count: i64 = db.query_row("SELECT COUNT(*) FROM offerings", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
