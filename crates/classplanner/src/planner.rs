//! Search, select and schedule operations over the shared state.

use rand::Rng;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::schedule::WeeklySchedule;
use crate::search::SessionKey;
use crate::suggest::Suggestion;
use crate::types::{Offering, PlannerState, Weekday};

impl PlannerState {
    /// Runs a course search for `session`.
    ///
    /// The session's previous results are cleared first, so after a failed
    /// search nothing is selectable. On success the built offerings become
    /// the session's current results.
    pub async fn search(
        &self,
        session: &SessionKey,
        term: Option<&str>,
        subject: &str,
        course: &str,
    ) -> Result<Vec<Offering>> {
        let correlation_id = generate_correlation_id();
        let term = term.unwrap_or(&self.config.term);

        info!(
            correlation_id = %correlation_id,
            session = %session,
            term = %term,
            subject = %subject,
            course = %course,
            "Starting course search"
        );

        self.search_cache.clear_session(session);

        let details = self
            .provider
            .get_course_details(term, subject, course)
            .await
            .inspect_err(|e| {
                warn!(correlation_id = %correlation_id, error = %e, "Provider request failed")
            })?;

        let offerings = self
            .offering_builder
            .build_course(&details)
            .inspect_err(|e| {
                warn!(correlation_id = %correlation_id, error = %e, "Could not group sections")
            })?;

        self.search_cache.replace(session.clone(), offerings.clone());

        info!(
            correlation_id = %correlation_id,
            count = offerings.len(),
            "Search complete"
        );

        Ok(offerings)
    }

    /// The session's current search results.
    pub fn search_results(&self, session: &SessionKey) -> Vec<Offering> {
        self.search_cache.results(session)
    }

    /// Saves the offering at `index` of the session's current results.
    ///
    /// # Errors
    /// * `IndexOutOfRange` if `index` does not address the current results
    /// * `Store` if the insert fails
    pub fn select(&self, session: &SessionKey, index: usize) -> Result<Offering> {
        let offering = self.search_cache.select(session, index)?;
        let saved = self.schedule_db.insert_offering(&offering)?;

        info!(
            session = %session,
            index,
            offering_id = saved.id,
            course = %saved.course_label(),
            "Saved offering"
        );

        Ok(saved)
    }

    pub fn weekly_schedule(&self) -> Result<WeeklySchedule> {
        let offerings = self.schedule_db.all_offerings()?;
        Ok(WeeklySchedule::from_offerings(&offerings))
    }

    pub fn day_schedule(&self, day: Weekday) -> Result<Vec<Offering>> {
        self.schedule_db.offerings_for_day(day)
    }

    /// Periodically drops expired search results of every session.
    ///
    /// Sessions that never search again would otherwise keep their results
    /// in memory. The task ends once the state is dropped.
    pub fn spawn_cache_sweeper(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let state: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await;

            loop {
                interval.tick().await;

                let Some(state) = state.upgrade() else {
                    break;
                };
                state.search_cache.cleanup_expired();
                debug!(
                    entries = state.search_cache.stats().total_entries,
                    "Swept expired search results"
                );
            }
        })
    }

    /// Asks the suggestion service for a timetable over every saved offering.
    pub async fn suggest(&self) -> Result<Suggestion> {
        let offerings = self.schedule_db.all_offerings()?;
        self.suggestion_client.suggest(&offerings).await
    }
}

/// Generates a short id tying together the log lines of one search.
fn generate_correlation_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros();
    let random: u32 = rand::thread_rng().gen();
    format!("{:x}-{:08x}", timestamp & 0xFFFFFFFF, random)
}
