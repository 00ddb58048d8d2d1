use crate::models::{RouteCandidate, SearchAttemptResult};

/// Score a candidate against the target distance. Pure; retries live in the caller.
pub fn evaluate(
    candidate: RouteCandidate,
    target_distance_meters: f64,
    tolerance_meters: f64,
) -> SearchAttemptResult {
    let absolute_distance_error = (candidate.distance_meters - target_distance_meters).abs();
    SearchAttemptResult {
        within_tolerance: absolute_distance_error <= tolerance_meters,
        absolute_distance_error,
        candidate,
    }
}
