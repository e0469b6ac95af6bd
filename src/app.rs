use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post, put},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/data", get(handlers::get_data))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/students", post(handlers::add_student))
        .route("/api/students/:id", delete(handlers::remove_student))
        .route("/api/attendance", put(handlers::set_attendance))
        .route("/api/attendance/cycle", post(handlers::cycle_attendance))
        .route("/api/settings", put(handlers::update_settings))
        .route("/api/export/csv", get(handlers::export_csv))
        .route("/api/export/json", get(handlers::export_json))
        .route("/api/import", post(handlers::import_backup))
        .route("/api/chat", post(handlers::chat))
        .with_state(state)
}
