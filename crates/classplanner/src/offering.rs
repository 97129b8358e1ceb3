//! Groups a course's flat section feed into selectable offerings.
//!
//! The feed lists lecture sections and recitation sections interleaved. Every
//! recitation section belongs to the most recent lecture before it, and each
//! of its meetings becomes its own offering paired with that lecture. A
//! lecture that collects no recitation meetings becomes one lecture-only
//! offering.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, ScheduleError};
use crate::types::{CourseDetails, Offering, Section, SectionKind, TimeWindow};

/// What to do with the last lecture of the feed when no recitation follows it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingLecture {
    /// Emit it as a lecture-only offering, like every other lecture
    #[default]
    Emit,
    /// Drop it. Lecture-only offerings are only flushed when the next lecture
    /// shows up, so the last one never is; older saved indices rely on this.
    Drop,
}

/// Builds offerings from the section feed of one course.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfferingBuilder {
    trailing_lecture: TrailingLecture,
}

/// Lecture currently in scope while walking the feed.
struct LectureCursor {
    window: TimeWindow,
    recitations_seen: usize,
}

impl OfferingBuilder {
    pub fn new(trailing_lecture: TrailingLecture) -> Self {
        Self { trailing_lecture }
    }

    /// Builds offerings for a provider response.
    pub fn build_course(&self, course: &CourseDetails) -> Result<Vec<Offering>> {
        self.build(&course.subject_code, &course.course_number, &course.sections)
    }

    /// Walks `sections` once, in feed order, and returns the offerings with
    /// indices `0..n` in emission order.
    ///
    /// # Errors
    /// * `InputParse` if `sections` is empty, a recitation appears before any
    ///   lecture, a lecture has no meetings, or a meeting has a malformed
    ///   time or day string.
    pub fn build(
        &self,
        subject: &str,
        course_number: &str,
        sections: &[Section],
    ) -> Result<Vec<Offering>> {
        if sections.is_empty() {
            return Err(ScheduleError::input(format!(
                "No sections found for {} {}",
                subject, course_number
            )));
        }

        let mut offerings = Vec::new();
        let mut emit = |lecture: TimeWindow, recitation: Option<TimeWindow>| {
            let offering = Offering {
                id: None,
                subject: subject.to_string(),
                course_number: course_number.to_string(),
                lecture,
                recitation,
                index: offerings.len(),
            };
            debug!(
                index = offering.index,
                lecture = %offering.lecture.span(),
                recitation = ?offering.recitation.map(|r| r.span()),
                "Emitting offering"
            );
            offerings.push(offering);
        };

        let mut current: Option<LectureCursor> = None;

        for (position, section) in sections.iter().enumerate() {
            match section.kind() {
                SectionKind::Lecture => {
                    if let Some(previous) = current.take() {
                        if previous.recitations_seen == 0 {
                            emit(previous.window, None);
                        }
                    }

                    let meeting = section.meetings.first().ok_or_else(|| {
                        ScheduleError::input(format!(
                            "Lecture section #{} of {} {} has no meetings",
                            position, subject, course_number
                        ))
                    })?;

                    current = Some(LectureCursor {
                        window: TimeWindow::from_meeting(meeting)?,
                        recitations_seen: 0,
                    });
                }
                SectionKind::Recitation => {
                    let lecture = current.as_mut().ok_or_else(|| {
                        ScheduleError::input(format!(
                            "{} section #{} of {} {} appears before any lecture",
                            section.section_type, position, subject, course_number
                        ))
                    })?;

                    for meeting in &section.meetings {
                        emit(lecture.window, Some(TimeWindow::from_meeting(meeting)?));
                        lecture.recitations_seen += 1;
                    }
                }
            }
        }

        if let Some(last) = current {
            if last.recitations_seen == 0 && self.trailing_lecture == TrailingLecture::Emit {
                emit(last.window, None);
            }
        }

        info!(
            subject = %subject,
            course = %course_number,
            sections = sections.len(),
            offerings = offerings.len(),
            "Built offerings"
        );

        Ok(offerings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Meeting, Weekday};
    use chrono::NaiveTime;

    fn meeting(days: &str, start: &str, end: &str) -> Meeting {
        Meeting {
            days: days.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
        }
    }

    fn lecture(days: &str, start: &str, end: &str) -> Section {
        Section {
            section_type: "Lecture".to_string(),
            meetings: vec![meeting(days, start, end)],
        }
    }

    fn recitation(meetings: Vec<Meeting>) -> Section {
        Section {
            section_type: "Recitation".to_string(),
            meetings,
        }
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn build(policy: TrailingLecture, sections: &[Section]) -> Result<Vec<Offering>> {
        OfferingBuilder::new(policy).build("CS", "0445", sections)
    }

    #[test]
    fn test_lone_lecture_is_dropped_in_legacy_mode() {
        let sections = vec![lecture("MoWe", "10.00", "11.15")];
        let offerings = build(TrailingLecture::Drop, &sections).unwrap();
        assert!(offerings.is_empty());
    }

    #[test]
    fn test_lone_lecture_is_emitted_by_default() {
        let sections = vec![lecture("MoWe", "10.00", "11.15")];
        let offerings = build(TrailingLecture::default(), &sections).unwrap();

        assert_eq!(offerings.len(), 1);
        assert_eq!(offerings[0].index, 0);
        assert_eq!(offerings[0].recitation, None);
        assert_eq!(offerings[0].lecture.start, time(10, 0));
        assert_eq!(offerings[0].lecture.end, time(11, 15));
    }

    #[test]
    fn test_lecture_recitation_lecture() {
        let n = 3;
        let sections = vec![
            lecture("MoWe", "10.00", "11.15"),
            recitation(
                (0..n)
                    .map(|i| meeting("Fr", &format!("{}.00", 12 + i), &format!("{}.50", 12 + i)))
                    .collect(),
            ),
            lecture("TuTh", "9.30", "10.45"),
        ];

        let offerings = build(TrailingLecture::Emit, &sections).unwrap();
        assert_eq!(offerings.len(), n + 1);

        for (i, offering) in offerings.iter().enumerate() {
            assert_eq!(offering.index, i);
        }

        for (i, offering) in offerings.iter().take(n).enumerate() {
            assert_eq!(offering.lecture.start, time(10, 0));
            let rec = offering.recitation.unwrap();
            assert_eq!(rec.start, time(12 + i as u32, 0));
            assert!(rec.meets_on(Weekday::Friday));
        }

        // second lecture had nothing after it
        assert_eq!(offerings[n].lecture.start, time(9, 30));
        assert_eq!(offerings[n].recitation, None);

        let legacy = build(TrailingLecture::Drop, &sections).unwrap();
        assert_eq!(legacy.len(), n);
    }

    #[test]
    fn test_lecture_without_recitation_flushed_by_next_lecture() {
        let sections = vec![
            lecture("MoWeFr", "8.00", "8.50"),
            lecture("TuTh", "13.00", "14.15"),
            recitation(vec![meeting("We", "15.00", "15.50")]),
        ];

        for policy in [TrailingLecture::Emit, TrailingLecture::Drop] {
            let offerings = build(policy, &sections).unwrap();
            assert_eq!(offerings.len(), 2);
            assert_eq!(offerings[0].lecture.start, time(8, 0));
            assert_eq!(offerings[0].recitation, None);
            assert_eq!(offerings[1].lecture.start, time(13, 0));
            assert_eq!(offerings[1].recitation.unwrap().start, time(15, 0));
            assert_eq!(offerings[1].index, 1);
        }
    }

    #[test]
    fn test_recitation_sections_pair_with_latest_lecture() {
        // recitations for the first lecture arrive in two separate sections
        let sections = vec![
            lecture("MoWe", "10.00", "11.15"),
            recitation(vec![meeting("Tu", "9.00", "9.50")]),
            recitation(vec![
                meeting("Th", "9.00", "9.50"),
                meeting("Fr", "11.00", "11.50"),
            ]),
            lecture("TuTh", "16.00", "17.15"),
            recitation(vec![meeting("Mo", "14.00", "14.50")]),
        ];

        let offerings = build(TrailingLecture::Emit, &sections).unwrap();
        assert_eq!(offerings.len(), 4);
        assert!(offerings[..3]
            .iter()
            .all(|o| o.lecture.start == time(10, 0)));
        assert_eq!(offerings[3].lecture.start, time(16, 0));
        assert_eq!(
            offerings.iter().map(|o| o.index).collect::<Vec<_>>(),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn test_only_first_lecture_meeting_used() {
        let mut section = lecture("MoWe", "10.00", "11.15");
        section.meetings.push(meeting("Fr", "10.00", "10.50"));
        let offerings = build(TrailingLecture::Emit, &[section]).unwrap();
        assert_eq!(offerings.len(), 1);
        assert_eq!(offerings[0].lecture.days.to_string(), "MoWe");
    }

    #[test]
    fn test_empty_recitation_section_contributes_nothing() {
        let sections = vec![lecture("MoWe", "10.00", "11.15"), recitation(vec![])];
        let offerings = build(TrailingLecture::Emit, &sections).unwrap();
        // no recitation meeting was seen, so the lecture stands alone
        assert_eq!(offerings.len(), 1);
        assert_eq!(offerings[0].recitation, None);
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let err = build(TrailingLecture::Emit, &[]).unwrap_err();
        assert!(matches!(err, ScheduleError::InputParse { .. }));
    }

    #[test]
    fn test_recitation_before_lecture_is_an_error() {
        let sections = vec![
            recitation(vec![meeting("Fr", "12.00", "12.50")]),
            lecture("MoWe", "10.00", "11.15"),
        ];
        let err = build(TrailingLecture::Emit, &sections).unwrap_err();
        assert!(matches!(err, ScheduleError::InputParse { .. }));
    }

    #[test]
    fn test_tba_recitation_is_kept_without_weekdays() {
        let sections = vec![
            lecture("MoWe", "10.00", "11.15"),
            recitation(vec![
                meeting("Fr", "12.00", "12.50"),
                meeting("TBA", "0.00", "0.00"),
            ]),
        ];
        let offerings = build(TrailingLecture::Emit, &sections).unwrap();

        assert_eq!(offerings.len(), 2);
        let tba = offerings[1].recitation.unwrap();
        assert!(tba.days.is_empty());
        assert_eq!(offerings[1].index, 1);
        assert!(Weekday::ALL
            .into_iter()
            .all(|day| !offerings[1].recitation_only_on(day)));
        assert!(offerings[1].scheduled_on(Weekday::Monday));
    }

    #[test]
    fn test_bad_time_aborts_build() {
        let sections = vec![
            lecture("MoWe", "10.00", "11.15"),
            recitation(vec![meeting("Fr", "noon", "12.50")]),
        ];
        let err = build(TrailingLecture::Emit, &sections).unwrap_err();
        assert!(matches!(err, ScheduleError::InputParse { .. }));
    }

    #[test]
    fn test_build_course_uses_course_codes() {
        let course = CourseDetails {
            subject_code: "MATH".to_string(),
            course_number: "0220".to_string(),
            sections: vec![lecture("MoWeFr", "9.00", "9.50")],
        };
        let offerings = OfferingBuilder::default().build_course(&course).unwrap();
        assert_eq!(offerings[0].subject, "MATH");
        assert_eq!(offerings[0].course_number, "0220");
    }
}
