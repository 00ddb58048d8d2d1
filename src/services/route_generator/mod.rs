pub mod evaluation;
pub mod geometry;
mod round_trip_strategy;
pub mod target_params;
mod waypoint_loop;
pub mod waypoint_ring;

use crate::config::RouteGeneratorConfig;
use crate::constants::MAX_ROUTE_WAYPOINTS;
use crate::error::{AppError, Result};
use crate::models::{Coordinates, FinalRoute, RouteStrategy, SearchOptions, TargetSpec};
use crate::services::routing::RoutingEngine;
use std::sync::Arc;

pub use round_trip_strategy::RoundTripOutcome;
use round_trip_strategy::RoundTripStrategy;
use target_params::{point_count_for_distance, tolerance_meters_with, validate_correction_factor};
use waypoint_loop::WaypointLoopGenerator;

pub struct RouteGenerator {
    engine: Arc<dyn RoutingEngine>,
    config: RouteGeneratorConfig,
    round_trip_strategy: RoundTripStrategy,
    waypoint_loop_generator: WaypointLoopGenerator,
}

impl RouteGenerator {
    pub fn new(engine: Arc<dyn RoutingEngine>, config: RouteGeneratorConfig) -> Self {
        let round_trip_strategy = RoundTripStrategy::new(engine.clone(), config.clone());
        let waypoint_loop_generator = WaypointLoopGenerator::new(engine.clone());

        RouteGenerator {
            engine,
            config,
            round_trip_strategy,
            waypoint_loop_generator,
        }
    }

    pub fn config(&self) -> &RouteGeneratorConfig {
        &self.config
    }

    /// Whether the routing engine can be called at all
    pub fn engine_status(&self) -> Result<()> {
        self.engine.ensure_configured()
    }

    pub fn tolerance_for(&self, target_distance_meters: f64) -> f64 {
        tolerance_meters_with(
            target_distance_meters,
            self.config.tolerance_fraction,
            self.config.tolerance_min_m,
            self.config.tolerance_max_m,
        )
    }

    /// Generate a loop of roughly `target.target_distance_meters` starting and ending at
    /// `target.start`.
    ///
    /// Tries engine-native round trips first (when enabled and the target is long enough),
    /// accepting the first in-tolerance route or else the closest one. Only when no round
    /// trip succeeded does it route through a spherical waypoint ring.
    pub async fn generate(&self, target: &TargetSpec, options: &SearchOptions) -> Result<FinalRoute> {
        self.engine.ensure_configured()?;

        let correction_factor = validate_correction_factor(
            options
                .correction_factor
                .unwrap_or(self.config.default_correction_factor),
        )
        .map_err(AppError::InvalidRequest)?;

        let tolerance_m = self.tolerance_for(target.target_distance_meters);
        let point_count = point_count_for_distance(target.target_distance_km());

        tracing::info!(
            target_m = %format!("{:.0}", target.target_distance_meters),
            tolerance_m = %format!("{:.0}", tolerance_m),
            points = point_count,
            seed = ?target.seed,
            "Generating loop from {:?}, target: {:.1}km",
            target.start,
            target.target_distance_km()
        );

        let mut attempts_made = 0;

        if self.round_trip_strategy.applies(target, options) {
            if let Some(outcome) = self
                .round_trip_strategy
                .search(target, point_count, tolerance_m)
                .await?
            {
                let waypoints = geometry::resample_waypoints(
                    &outcome.best.candidate.coordinates,
                    target.start,
                    point_count,
                );
                return Ok(FinalRoute::new(
                    outcome.best.candidate,
                    waypoints,
                    RouteStrategy::RoundTrip,
                    outcome.attempts_made,
                )
                .with_target(target.target_distance_meters, tolerance_m));
            }

            attempts_made = self.config.round_trip_correction_factors.len();
            tracing::warn!(
                attempts = attempts_made,
                "Round trip produced no route, falling back to waypoint ring"
            );
        } else {
            tracing::debug!(
                target_m = %format!("{:.0}", target.target_distance_meters),
                "Round trip skipped, using waypoint ring"
            );
        }

        let (candidate, ring) = self
            .waypoint_loop_generator
            .generate_loop(target, point_count, correction_factor)
            .await?;

        Ok(FinalRoute::new(
            candidate,
            ring,
            RouteStrategy::WaypointRing,
            attempts_made + 1,
        )
        .with_target(target.target_distance_meters, tolerance_m))
    }

    /// Route through caller-supplied waypoints as given, without distance matching
    pub async fn regenerate(&self, waypoints: &[Coordinates]) -> Result<FinalRoute> {
        self.engine.ensure_configured()?;

        if waypoints.len() < 2 {
            return Err(AppError::InvalidRequest(
                "At least 2 waypoints are required to regenerate a route".to_string(),
            ));
        }
        if waypoints.len() > MAX_ROUTE_WAYPOINTS {
            return Err(AppError::InvalidRequest(format!(
                "At most {} waypoints are allowed, got {}",
                MAX_ROUTE_WAYPOINTS,
                waypoints.len()
            )));
        }

        tracing::info!(
            waypoints = waypoints.len(),
            "Regenerating route through {} waypoints",
            waypoints.len()
        );

        let candidate = self.engine.walking_route(waypoints).await?;
        Ok(FinalRoute::new(
            candidate,
            waypoints.to_vec(),
            RouteStrategy::Regenerated,
            1,
        ))
    }
}
