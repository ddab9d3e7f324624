pub mod dashboard;
pub mod status;
pub mod swagger;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::AppState;

/// Build the API v1 router
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(dashboard::get_dashboard))
        .route("/charts", get(dashboard::get_charts))
        .route("/status", post(dashboard::post_status))
}
