use axum::{
    Router,
    routing::{get, post},
};

use crate::{AppState, handlers};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health_check))
        .route("/api/register", post(handlers::register))
        .route("/api/login", post(handlers::login))
        .route("/api/user", get(handlers::get_user))
        .route("/api/households", post(handlers::create_household))
        .route(
            "/api/households/{household_id}/pods",
            post(handlers::create_pod),
        )
        .route(
            "/api/households/{household_id}/members",
            post(handlers::create_member),
        )
        .route(
            "/api/households/{household_id}/activities",
            post(handlers::record_activity),
        )
        .route(
            "/family-health-metrics",
            get(handlers::get_family_health_metrics),
        )
        .route("/achievements", get(handlers::get_achievements))
        .route("/milestones", get(handlers::get_milestones))
        .with_state(state)
}
