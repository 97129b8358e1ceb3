/// Domain types and the state shared by every request handler
mod course;
mod days;

pub use course::*;
pub use days::*;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::ScheduleDbManager;
use crate::offering::OfferingBuilder;
use crate::provider::CourseProvider;
use crate::search::SearchCache;
use crate::suggest::SuggestionClient;

/// Server state, handed to handlers as `State<Arc<PlannerState>>`.
pub struct PlannerState {
    pub config: AppConfig,
    /// Saved offerings
    pub schedule_db: ScheduleDbManager,
    /// Latest search results, per session
    pub search_cache: SearchCache,
    pub provider: Arc<dyn CourseProvider>,
    pub offering_builder: OfferingBuilder,
    pub suggestion_client: SuggestionClient,
}

impl PlannerState {
    pub fn new(
        config: AppConfig,
        schedule_db: ScheduleDbManager,
        provider: Arc<dyn CourseProvider>,
        suggestion_client: SuggestionClient,
    ) -> Self {
        Self {
            search_cache: SearchCache::new(config.search_cache_ttl()),
            offering_builder: OfferingBuilder::new(config.trailing_lecture),
            config,
            schedule_db,
            provider,
            suggestion_client,
        }
    }
}
