use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/log", post(handlers::add_log_form))
        .route("/api/users", get(handlers::list_users).post(handlers::create_user))
        .route("/api/users/:name", get(handlers::get_profile))
        .route("/api/users/:name/settings", put(handlers::update_settings))
        .route("/api/users/:name/logs", post(handlers::add_log))
        .route("/api/users/:name/logs/:date", delete(handlers::remove_log))
        .route("/api/users/:name/summary", get(handlers::get_summary))
        .route("/api/users/:name/series", get(handlers::get_series))
        .with_state(state)
}
