//! Weekly view of saved offerings, bucketed Monday through Friday.

use serde::{Deserialize, Serialize};

use crate::types::{Offering, Weekday};

/// Saved offerings grouped by the weekday they meet on.
///
/// An offering is listed under every day its lecture meets, and under every
/// day only its recitation meets. It never appears twice in the same day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    pub monday: Vec<Offering>,
    pub tuesday: Vec<Offering>,
    pub wednesday: Vec<Offering>,
    pub thursday: Vec<Offering>,
    pub friday: Vec<Offering>,
}

impl WeeklySchedule {
    /// Buckets `offerings`, keeping their order within each rule: lecture-day
    /// matches first, then recitation-only matches.
    pub fn from_offerings(offerings: &[Offering]) -> Self {
        let mut schedule = WeeklySchedule::default();

        for day in Weekday::ALL {
            let by_lecture = offerings.iter().filter(|o| o.lecture.meets_on(day));
            let by_recitation = offerings.iter().filter(|o| o.recitation_only_on(day));
            schedule
                .day_mut(day)
                .extend(by_lecture.chain(by_recitation).cloned());
        }

        schedule
    }

    pub fn day(&self, day: Weekday) -> &[Offering] {
        match day {
            Weekday::Monday => &self.monday,
            Weekday::Tuesday => &self.tuesday,
            Weekday::Wednesday => &self.wednesday,
            Weekday::Thursday => &self.thursday,
            Weekday::Friday => &self.friday,
        }
    }

    fn day_mut(&mut self, day: Weekday) -> &mut Vec<Offering> {
        match day {
            Weekday::Monday => &mut self.monday,
            Weekday::Tuesday => &mut self.tuesday,
            Weekday::Wednesday => &mut self.wednesday,
            Weekday::Thursday => &mut self.thursday,
            Weekday::Friday => &mut self.friday,
        }
    }

    /// Days in Monday..Friday order with their offerings.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &[Offering])> {
        Weekday::ALL.into_iter().map(move |day| (day, self.day(day)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, offerings)| offerings.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DaySet, TimeWindow};
    use chrono::NaiveTime;

    fn window(days: &str, hour: u32) -> TimeWindow {
        TimeWindow {
            start: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(hour, 50, 0).unwrap(),
            days: DaySet::parse(days).unwrap(),
        }
    }

    fn offering(index: usize, lecture: &str, recitation: Option<&str>) -> Offering {
        Offering {
            id: Some(index as i64 + 1),
            subject: "CS".to_string(),
            course_number: format!("04{:02}", index),
            lecture: window(lecture, 10),
            recitation: recitation.map(|days| window(days, 14)),
            index,
        }
    }

    fn days_listing(schedule: &WeeklySchedule, target: &Offering) -> Vec<Weekday> {
        schedule
            .iter()
            .flat_map(|(day, offerings)| {
                offerings
                    .iter()
                    .filter(move |o| *o == target)
                    .map(move |_| day)
            })
            .collect()
    }

    #[test]
    fn test_recitation_on_other_day() {
        let o = offering(0, "MoWe", Some("Fr"));
        let schedule = WeeklySchedule::from_offerings(std::slice::from_ref(&o));
        assert_eq!(
            days_listing(&schedule, &o),
            vec![Weekday::Monday, Weekday::Wednesday, Weekday::Friday]
        );
    }

    #[test]
    fn test_recitation_on_lecture_day_listed_once() {
        let o = offering(0, "MoWe", Some("Mo"));
        let schedule = WeeklySchedule::from_offerings(std::slice::from_ref(&o));
        assert_eq!(schedule.monday.len(), 1);
        assert_eq!(schedule.wednesday.len(), 1);
        assert_eq!(
            days_listing(&schedule, &o),
            vec![Weekday::Monday, Weekday::Wednesday]
        );
    }

    #[test]
    fn test_lecture_matches_come_first() {
        let recitation_only = offering(0, "TuTh", Some("Mo"));
        let lecture_monday = offering(1, "MoWeFr", None);
        let schedule =
            WeeklySchedule::from_offerings(&[recitation_only.clone(), lecture_monday.clone()]);
        assert_eq!(schedule.monday, vec![lecture_monday, recitation_only]);
    }

    #[test]
    fn test_empty_store_gives_empty_days() {
        let schedule = WeeklySchedule::from_offerings(&[]);
        assert!(schedule.is_empty());
        assert_eq!(schedule.iter().count(), 5);
    }

    #[test]
    fn test_query_is_idempotent() {
        let offerings = vec![
            offering(0, "MoWe", Some("Fr")),
            offering(1, "TuTh", None),
            offering(2, "MoWeFr", Some("Tu")),
        ];
        let first = WeeklySchedule::from_offerings(&offerings);
        let second = WeeklySchedule::from_offerings(&offerings);
        assert_eq!(first, second);
        assert_eq!(first.tuesday.len(), 2);
    }

    #[test]
    fn test_serializes_by_day_name() {
        let schedule = WeeklySchedule::from_offerings(&[offering(0, "Th", None)]);
        let json = serde_json::to_value(&schedule).unwrap();
        assert_eq!(json["thursday"].as_array().unwrap().len(), 1);
        assert!(json["monday"].as_array().unwrap().is_empty());
    }
}
