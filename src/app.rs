use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/breathing", get(handlers::breathing_pattern))
        .route(
            "/api/users/:user_id/profile",
            get(handlers::get_profile).put(handlers::put_profile),
        )
        .route(
            "/api/users/:user_id/cravings",
            get(handlers::list_cravings).post(handlers::create_craving),
        )
        .route(
            "/api/users/:user_id/cravings/:craving_id",
            patch(handlers::update_craving).delete(handlers::delete_craving),
        )
        .route(
            "/api/users/:user_id/cravings/:craving_id/resolve",
            post(handlers::resolve_craving),
        )
        .route("/api/users/:user_id/stats", get(handlers::get_stats))
        .route("/api/users/:user_id/badges", get(handlers::get_badges))
        .route("/api/users/:user_id/recovery", get(handlers::get_recovery))
        .with_state(state)
}
