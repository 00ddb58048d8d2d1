use crate::error::{AppError, Result};
use crate::models::route::SegmentsRequest;
use crate::models::SegmentClassification;
use crate::services::route_generator::geometry::classify_segments;
use axum::Json;

/// POST /routes/segments
/// Split a path into normal and self-overlapping segments for display
pub async fn classify_route_segments(
    Json(request): Json<SegmentsRequest>,
) -> Result<Json<SegmentClassification>> {
    let path = request.path().map_err(AppError::InvalidRequest)?;
    let classification = classify_segments(&path)?;

    tracing::debug!(
        points = path.len(),
        overlapping = classification.overlapping.len(),
        "Classified {} segments, {} overlapping",
        classification.normal.len() + classification.overlapping.len(),
        classification.overlapping.len()
    );

    Ok(Json(classification))
}
