use super::evaluation::evaluate;
use crate::config::RouteGeneratorConfig;
use crate::error::Result;
use crate::models::{SearchAttemptResult, SearchOptions, TargetSpec};
use crate::services::routing::{RoundTripRequest, RoutingEngine};
use std::sync::Arc;

/// Handles the engine-native round-trip attempts and their acceptance policy
pub struct RoundTripStrategy {
    engine: Arc<dyn RoutingEngine>,
    config: RouteGeneratorConfig,
}

/// Result of a round-trip search that produced at least one route
#[derive(Debug, Clone)]
pub struct RoundTripOutcome {
    pub best: SearchAttemptResult,
    /// 1-based attempt that produced `best`
    pub attempt: usize,
    /// Engine calls made, failed ones included
    pub attempts_made: usize,
}

impl RoundTripStrategy {
    pub fn new(engine: Arc<dyn RoutingEngine>, config: RouteGeneratorConfig) -> Self {
        Self { engine, config }
    }

    /// Whether round-trip mode runs for this target. The request toggle wins over
    /// configuration, but short targets always skip it.
    pub fn applies(&self, target: &TargetSpec, options: &SearchOptions) -> bool {
        let enabled = options.round_trip.unwrap_or(self.config.round_trip_enabled);
        enabled && target.target_distance_meters >= self.config.round_trip_min_distance_m
    }

    /// Run the attempt budget in order, one engine call per correction factor.
    ///
    /// Returns the first in-tolerance result, otherwise the attempt with the smallest
    /// distance error. `Ok(None)` means every attempt failed with a retryable error.
    pub async fn search(
        &self,
        target: &TargetSpec,
        point_count: usize,
        tolerance_m: f64,
    ) -> Result<Option<RoundTripOutcome>> {
        let budget = self.config.round_trip_correction_factors.len();
        let mut best: Option<(SearchAttemptResult, usize)> = None;
        let mut attempts_made = 0;

        for (index, &factor) in self.config.round_trip_correction_factors.iter().enumerate() {
            let attempt = index + 1;
            let request = RoundTripRequest {
                start: target.start,
                length_meters: target.target_distance_meters * factor,
                points: point_count,
                seed: target.seed.map(|seed| seed.wrapping_add(index as u32)),
                preferences: target.preferences.clone(),
            };

            tracing::debug!(
                attempt,
                budget,
                factor,
                seed = ?request.seed,
                length_m = %format!("{:.0}", request.length_meters),
                "Round trip attempt {}/{}: requesting {:.0}m loop",
                attempt,
                budget,
                request.length_meters
            );

            attempts_made += 1;
            let candidate = match self.engine.round_trip_route(&request).await {
                Ok(candidate) => candidate,
                Err(e) if e.is_retryable() => {
                    tracing::warn!(
                        attempt,
                        error = %e,
                        "Round trip attempt {}/{} failed, continuing",
                        attempt,
                        budget
                    );
                    continue;
                }
                Err(e) => return Err(e),
            };

            let result = evaluate(candidate, target.target_distance_meters, tolerance_m);

            tracing::debug!(
                attempt,
                distance_m = %format!("{:.0}", result.candidate.distance_meters),
                error_m = %format!("{:.0}", result.absolute_distance_error),
                within_tolerance = result.within_tolerance,
                "Round trip attempt {} returned {:.0}m (target {:.0}m ± {:.0}m)",
                attempt,
                result.candidate.distance_meters,
                target.target_distance_meters,
                tolerance_m
            );

            if result.within_tolerance {
                tracing::info!(
                    attempt,
                    distance_m = %format!("{:.0}", result.candidate.distance_meters),
                    "Round trip accepted on attempt {}",
                    attempt
                );
                return Ok(Some(RoundTripOutcome {
                    best: result,
                    attempt,
                    attempts_made,
                }));
            }

            let improves = best
                .as_ref()
                .map(|(current, _)| result.absolute_distance_error < current.absolute_distance_error)
                .unwrap_or(true);
            if improves {
                best = Some((result, attempt));
            }
        }

        match best {
            Some((best, attempt)) => {
                tracing::info!(
                    attempt,
                    error_m = %format!("{:.0}", best.absolute_distance_error),
                    "No round trip within tolerance, keeping closest from attempt {}",
                    attempt
                );
                Ok(Some(RoundTripOutcome {
                    best,
                    attempt,
                    attempts_made,
                }))
            }
            None => {
                tracing::warn!(
                    attempts = attempts_made,
                    "All {} round trip attempts failed",
                    attempts_made
                );
                Ok(None)
            }
        }
    }
}
