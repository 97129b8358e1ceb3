use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::server::endpoints::{schedule, search, status, suggest};
use crate::types::PlannerState;

mod endpoints;
mod types;
mod util;

pub use types::ApiErrorType;
pub use util::SESSION_HEADER;

/// Creates a router that can be used by `axum`.
///
/// # Parameters
/// - `app_state`: The app server state.
///
/// # Returns
/// The router.
pub fn create_router(app_state: Arc<PlannerState>) -> Router {
    // Search results live per session; selection reads them back by index
    let search_router = Router::new()
        .route(
            "/search",
            get(search::get_search_results).post(search::post_search),
        )
        .route("/search/cache_stats", get(status::get_cache_stats))
        .route("/add/:index", post(search::post_add));

    let schedule_router = Router::new()
        .route("/myclasses", get(schedule::get_my_classes))
        .route("/myclasses/:day", get(schedule::get_day_classes))
        .route("/suggest", post(suggest::post_suggest));

    Router::new()
        .route("/health", get(status::get_health))
        .merge(search_router)
        .merge(schedule_router)
        .with_state(app_state)
}
