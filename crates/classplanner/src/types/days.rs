/// Weekday codes used by the course feed (`Mo`, `Tu`, `We`, `Th`, `Fr`)
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::error::ScheduleError;

/// One of the five teaching days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// The two-letter code used in day strings (e.g. `"Mo"`)
    pub fn code(self) -> &'static str {
        match self {
            Weekday::Monday => "Mo",
            Weekday::Tuesday => "Tu",
            Weekday::Wednesday => "We",
            Weekday::Thursday => "Th",
            Weekday::Friday => "Fr",
        }
    }

    /// Three-letter label used by the suggestion format (e.g. `"Mon"`)
    pub fn short_name(self) -> &'static str {
        match self {
            Weekday::Monday => "Mon",
            Weekday::Tuesday => "Tue",
            Weekday::Wednesday => "Wed",
            Weekday::Thursday => "Thu",
            Weekday::Friday => "Fri",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Mo" => Some(Weekday::Monday),
            "Tu" => Some(Weekday::Tuesday),
            "We" => Some(Weekday::Wednesday),
            "Th" => Some(Weekday::Thursday),
            "Fr" => Some(Weekday::Friday),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
        };
        f.write_str(name)
    }
}

/// Accepts a two-letter code, a three-letter label or a full name, in any case.
impl FromStr for Weekday {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Weekday::ALL
            .into_iter()
            .find(|day| {
                lower == day.code().to_ascii_lowercase()
                    || lower == day.short_name().to_ascii_lowercase()
                    || lower == day.to_string().to_ascii_lowercase()
            })
            .ok_or_else(|| ScheduleError::input(format!("Unknown weekday: {:?}", s)))
    }
}

/// Set of weekdays a meeting recurs on.
///
/// Serialized as the concatenated code string (`"MoWeFr"`), always in
/// Monday..Friday order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DaySet(u8);

impl DaySet {
    pub fn empty() -> Self {
        DaySet(0)
    }

    pub fn contains(self, day: Weekday) -> bool {
        self.0 & day.bit() != 0
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= day.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        Weekday::ALL.into_iter().filter(move |day| self.contains(*day))
    }

    /// Parses a concatenated day string such as `"MoWeFr"`.
    ///
    /// Weekend codes are accepted and dropped since only weekdays are
    /// scheduled.
    pub fn parse(raw: &str) -> Result<Self, ScheduleError> {
        let raw = raw.trim();
        if !raw.is_ascii() || raw.len() % 2 != 0 {
            return Err(ScheduleError::input(format!(
                "Malformed day string: {:?}",
                raw
            )));
        }

        let mut days = DaySet::empty();
        for chunk in raw.as_bytes().chunks(2) {
            // ascii was checked above
            let code = std::str::from_utf8(chunk).unwrap_or_default();
            match Weekday::from_code(code) {
                Some(day) => days.insert(day),
                None if code == "Sa" || code == "Su" => {}
                None => {
                    return Err(ScheduleError::input(format!(
                        "Unknown day code {:?} in {:?}",
                        code, raw
                    )))
                }
            }
        }

        Ok(days)
    }

    /// Parses a day string from the course feed.
    ///
    /// Placeholders such as `"TBA"` mean the meeting has no fixed weekday, so
    /// anything [`DaySet::parse`] rejects becomes the empty set.
    pub fn from_feed(raw: &str) -> Self {
        DaySet::parse(raw).unwrap_or_else(|e| {
            warn!(days = %raw, error = %e, "Meeting is not on a fixed weekday");
            DaySet::empty()
        })
    }
}

impl FromIterator<Weekday> for DaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut days = DaySet::empty();
        for day in iter {
            days.insert(day);
        }
        days
    }
}

impl fmt::Display for DaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for day in self.iter() {
            f.write_str(day.code())?;
        }
        Ok(())
    }
}

impl FromStr for DaySet {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DaySet::parse(s)
    }
}

impl Serialize for DaySet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DaySet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DaySet::parse(&raw).map_err(serde::de::Error::custom)
    }
}
