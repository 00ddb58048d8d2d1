use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /health - Check if the routing engine can be reached and report cache usage
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut status = json!({
        "status": "ok",
        "checks": {}
    });

    match state.route_generator.engine_status() {
        Ok(()) => {
            status["checks"]["routing_engine"] = json!("ok");
        }
        Err(e) => {
            status["checks"]["routing_engine"] = json!({"error": e.to_string()});
            status["status"] = json!("error");
        }
    }

    if let Some(ref cache) = state.cache {
        let stats = cache.get_stats().await;
        status["checks"]["cache"] = json!({
            "backend": cache.backend_name(),
            "entries": stats.entries,
            "hits": stats.hits,
            "misses": stats.misses,
        });
    }

    Json(status)
}
