/// Course feed records and the offerings built from them
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use super::days::{DaySet, Weekday};
use crate::error::{Result, ScheduleError};

/// Section type tag the feed uses for lectures. Anything else is a
/// recitation-bearing section (recitation, lab, ...).
pub const LECTURE_TAG: &str = "Lecture";

/// One time-pattern entry of a section, as delivered by the course feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    /// Concatenated day codes, e.g. `"MoWeFr"`
    pub days: String,
    /// `hour.minute` string, e.g. `"14.30"`
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub section_type: String,
    #[serde(default)]
    pub meetings: Vec<Meeting>,
}

impl Section {
    pub fn kind(&self) -> SectionKind {
        if self.section_type == LECTURE_TAG {
            SectionKind::Lecture
        } else {
            SectionKind::Recitation
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Lecture,
    /// Recitations, labs and every other non-lecture section type
    Recitation,
}

/// Everything the course feed returns for one subject + course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDetails {
    pub subject_code: String,
    pub course_number: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// Parses the feed's `hour.minute` time format.
///
/// The digits after the first dot are the minute, taken literally: `"9.5"`
/// is 09:05, not 09:30. Parts past the second dot (`"10.30.00.000000"`) are
/// ignored.
pub fn parse_meeting_time(raw: &str) -> Result<NaiveTime> {
    let mut parts = raw.trim().split('.');
    let (hour, minute) = match (parts.next(), parts.next()) {
        (Some(hour), Some(minute)) => (hour, minute),
        _ => {
            return Err(ScheduleError::input(format!(
                "Time {:?} is not in hour.minute form",
                raw
            )))
        }
    };

    let hour: u32 = hour
        .parse()
        .map_err(|_| ScheduleError::input(format!("Bad hour in time {:?}", raw)))?;
    let minute: u32 = minute
        .parse()
        .map_err(|_| ScheduleError::input(format!("Bad minute in time {:?}", raw)))?;

    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| ScheduleError::input(format!("Time {:?} is out of range", raw)))
}

/// A recurring start/end time on a set of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub days: DaySet,
}

impl TimeWindow {
    pub fn from_meeting(meeting: &Meeting) -> Result<Self> {
        Ok(TimeWindow {
            start: parse_meeting_time(&meeting.start_time)?,
            end: parse_meeting_time(&meeting.end_time)?,
            days: DaySet::from_feed(&meeting.days),
        })
    }

    pub fn meets_on(&self, day: Weekday) -> bool {
        self.days.contains(day)
    }

    /// `HH:MM-HH:MM`
    pub fn span(&self) -> String {
        format!(
            "{:02}:{:02}-{:02}:{:02}",
            self.start.hour(),
            self.start.minute(),
            self.end.hour(),
            self.end.minute()
        )
    }
}

/// A lecture paired with at most one recitation meeting; the unit a student
/// selects and schedules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offering {
    /// Row id once persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub subject: String,
    pub course_number: String,
    pub lecture: TimeWindow,
    #[serde(default)]
    pub recitation: Option<TimeWindow>,
    /// Position within the search results it was built in
    pub index: usize,
}

impl Offering {
    /// `"CS 0445"`
    pub fn course_label(&self) -> String {
        format!("{} {}", self.subject, self.course_number)
    }

    /// Whether this offering is listed under `day` in the weekly view.
    ///
    /// A lecture day always counts. A recitation day counts only when the
    /// lecture does not already meet that day, so the offering is listed
    /// once per day.
    pub fn scheduled_on(&self, day: Weekday) -> bool {
        self.lecture.meets_on(day) || self.recitation_only_on(day)
    }

    /// True when the recitation meets on `day` and the lecture does not.
    pub fn recitation_only_on(&self, day: Weekday) -> bool {
        !self.lecture.meets_on(day)
            && self
                .recitation
                .as_ref()
                .is_some_and(|recitation| recitation.meets_on(day))
    }
}
