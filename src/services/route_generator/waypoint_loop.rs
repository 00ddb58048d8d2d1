use super::waypoint_ring::generate_ring;
use crate::error::Result;
use crate::models::{Coordinates, RouteCandidate, TargetSpec};
use crate::services::routing::RoutingEngine;
use std::sync::Arc;

/// Builds loops by routing through a spherical ring of waypoints.
/// Used when round-trip mode is skipped or produced nothing.
pub struct WaypointLoopGenerator {
    engine: Arc<dyn RoutingEngine>,
}

impl WaypointLoopGenerator {
    pub fn new(engine: Arc<dyn RoutingEngine>) -> Self {
        Self { engine }
    }

    /// One ordered-waypoints engine call through the ring. Engine failures propagate.
    pub async fn generate_loop(
        &self,
        target: &TargetSpec,
        point_count: usize,
        correction_factor: f64,
    ) -> Result<(RouteCandidate, Vec<Coordinates>)> {
        let ring = generate_ring(
            target.start,
            target.target_distance_meters,
            point_count,
            correction_factor,
        )?;

        tracing::info!(
            points = point_count,
            correction_factor,
            "Generating waypoint loop for {:.1}km target",
            target.target_distance_km()
        );

        let candidate = self.engine.walking_route(&ring).await?;

        tracing::info!(
            distance_m = %format!("{:.0}", candidate.distance_meters),
            "Waypoint loop generated: {:.2}km (target: {:.1}km)",
            candidate.distance_km(),
            target.target_distance_km()
        );

        Ok((candidate, ring))
    }
}
