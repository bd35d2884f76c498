use crate::handlers;
use crate::state::AppState;
use axum::{routing::{delete, get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/new", get(handlers::new_log_page))
        .route("/logs", post(handlers::submit_form))
        .route("/logs/:id/delete", post(handlers::delete_form))
        .route("/api/health", get(handlers::health))
        .route("/api/logs", get(handlers::list_logs).post(handlers::add_log))
        .route("/api/logs/:id", delete(handlers::delete_log))
        .with_state(state)
}
