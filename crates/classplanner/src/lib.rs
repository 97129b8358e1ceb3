//! Course search, offering grouping and weekly timetable service.
//!
//! A search pulls a course's section feed from a [`provider::CourseProvider`],
//! groups it into [`types::Offering`]s with [`offering::OfferingBuilder`] and
//! keeps them in the caller's [`search::SearchCache`] session. Selecting an
//! index saves that offering to the [`db::ScheduleDbManager`], and
//! [`schedule::WeeklySchedule`] buckets the saved offerings by weekday.

pub mod config;
pub mod db;
pub mod error;
pub mod offering;
pub mod planner;
pub mod provider;
pub mod schedule;
pub mod search;
pub mod server;
pub mod suggest;
pub mod types;

pub use error::{Result, ScheduleError};
