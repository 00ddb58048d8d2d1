pub mod generate_route;
pub mod health;
pub mod segments;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/routes/generate", post(generate_route::generate_route))
        .route("/routes/segments", post(segments::classify_route_segments))
        .route("/health", get(health::health_check))
        .with_state(state)
}
