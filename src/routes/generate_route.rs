use crate::cache::route_cache_key;
use crate::error::{AppError, Result};
use crate::models::route::{GenerateRouteRequest, GenerateRouteResponse};
use crate::models::{FinalRoute, Pace, TargetSpec};
use crate::services::route_generator::target_params::{
    duration_from_distance, resolve_target_km, validate_correction_factor,
};
use crate::AppState;
use axum::{extract::State, Json};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// POST /routes/generate
/// Generate a loop that starts and ends at the same point, or re-route explicit waypoints
pub async fn generate_route(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRouteRequest>,
) -> Result<Json<GenerateRouteResponse>> {
    if let Some(waypoints) = request.regeneration_waypoints() {
        let waypoints = waypoints.map_err(AppError::InvalidRequest)?;
        tracing::info!(
            waypoints = waypoints.len(),
            "Regenerate request with {} waypoints",
            waypoints.len()
        );

        let search_state = state.clone();
        let route = run_search(state.search_timeout, async move {
            search_state.route_generator.regenerate(&waypoints).await
        })
        .await?;
        return Ok(Json(into_response(route, request.pace)));
    }

    let start = request.start().map_err(AppError::InvalidRequest)?;
    let distance_km = resolve_target_km(request.distance_km, request.duration_minutes, request.pace)
        .map_err(AppError::InvalidRequest)?;
    if let Some(factor) = request.correction_factor {
        validate_correction_factor(factor).map_err(AppError::InvalidRequest)?;
    }

    let target = TargetSpec::new(start, distance_km * 1000.0)
        .map_err(AppError::InvalidRequest)?
        .with_preferences(request.preferences.clone())
        .with_seed(request.seed);
    let options = request.search_options();

    tracing::info!(
        lat = start.lat,
        lng = start.lng,
        distance_km,
        pace = %request.pace,
        seed = ?request.seed,
        "Route request: ({:.4}, {:.4}), {:.1}km, pace={}",
        start.lat, start.lng, distance_km, request.pace
    );

    let cache_key = route_cache_key(&target, &options);

    if let (Some(cache), Some(key)) = (&state.cache, &cache_key) {
        if let Some(route) = cache.get_cached_route(key).await {
            tracing::info!("Cache hit for seeded route request");
            return Ok(Json(into_response(route, request.pace)));
        }
    }

    let search_state = state.clone();
    let search_target = target.clone();
    let route = run_search(state.search_timeout, async move {
        search_state
            .route_generator
            .generate(&search_target, &options)
            .await
    })
    .await?;

    if let (Some(cache), Some(key)) = (&state.cache, &cache_key) {
        cache.cache_route(key, &route).await;
    }

    tracing::info!(
        strategy = ?route.strategy,
        attempts = route.attempts,
        within_tolerance = route.within_tolerance,
        "Route generated: {:.2}km for {:.1}km target",
        route.distance_km(),
        distance_km
    );

    Ok(Json(into_response(route, request.pace)))
}

/// Run one whole search on its own task, bounded by `limit`.
///
/// An expired search is aborted and reported as an upstream failure. A search task that
/// panics surfaces as an internal error.
async fn run_search<F>(limit: Duration, search: F) -> Result<FinalRoute>
where
    F: Future<Output = Result<FinalRoute>> + Send + 'static,
{
    let mut handle = tokio::spawn(search);
    match tokio::time::timeout(limit, &mut handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => Err(AppError::Internal(format!("Route search task failed: {}", e))),
        Err(_) => {
            handle.abort();
            Err(AppError::UpstreamService(format!(
                "Route search timed out after {}s",
                limit.as_secs()
            )))
        }
    }
}

fn into_response(route: FinalRoute, pace: Pace) -> GenerateRouteResponse {
    let estimated_duration_minutes = duration_from_distance(route.distance_km(), pace).round() as u32;
    GenerateRouteResponse {
        success: true,
        route,
        estimated_duration_minutes,
    }
}
