/// Row types for the offerings table
use chrono::NaiveTime;
use rusqlite::types::Type;
use rusqlite::Row;

use crate::types::{DaySet, Offering, TimeWindow};

/// Column list shared by every offerings SELECT, in `DbOffering::from_row` order
pub(super) const OFFERING_COLUMNS: &str = "offering_id, subject, course_number, \
     lecture_start, lecture_end, lecture_days, \
     recitation_start, recitation_end, recitation_days, search_index";

#[derive(Debug, Clone)]
pub struct DbOffering {
    pub offering_id: i64,
    pub subject: String,
    pub course_number: String,
    pub lecture_start: NaiveTime,
    pub lecture_end: NaiveTime,
    pub lecture_days: String,
    pub recitation_start: Option<NaiveTime>,
    pub recitation_end: Option<NaiveTime>,
    pub recitation_days: Option<String>,
    pub search_index: i64,
}

impl DbOffering {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(DbOffering {
            offering_id: row.get(0)?,
            subject: row.get(1)?,
            course_number: row.get(2)?,
            lecture_start: row.get(3)?,
            lecture_end: row.get(4)?,
            lecture_days: row.get(5)?,
            recitation_start: row.get(6)?,
            recitation_end: row.get(7)?,
            recitation_days: row.get(8)?,
            search_index: row.get(9)?,
        })
    }

    /// Converts the row back into an offering, re-validating the day strings.
    pub fn into_offering(self) -> rusqlite::Result<Offering> {
        let lecture = TimeWindow {
            start: self.lecture_start,
            end: self.lecture_end,
            days: parse_days(5, &self.lecture_days)?,
        };

        let recitation = match (self.recitation_start, self.recitation_end, self.recitation_days) {
            (Some(start), Some(end), Some(days)) => Some(TimeWindow {
                start,
                end,
                days: parse_days(8, &days)?,
            }),
            _ => None,
        };

        Ok(Offering {
            id: Some(self.offering_id),
            subject: self.subject,
            course_number: self.course_number,
            lecture,
            recitation,
            index: usize::try_from(self.search_index).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(9, Type::Integer, Box::new(e))
            })?,
        })
    }
}

fn parse_days(column: usize, raw: &str) -> rusqlite::Result<DaySet> {
    DaySet::parse(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}
