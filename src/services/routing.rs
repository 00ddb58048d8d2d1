use crate::error::Result;
use crate::models::{Coordinates, RouteCandidate, RoutePreferences};
use async_trait::async_trait;

/// Parameters for one engine-native round-trip request
#[derive(Debug, Clone, PartialEq)]
pub struct RoundTripRequest {
    pub start: Coordinates,
    /// Length handed to the engine, already scaled by the attempt's correction factor
    pub length_meters: f64,
    pub points: usize,
    /// `None` lets the engine adapter pick a random seed
    pub seed: Option<u32>,
    pub preferences: RoutePreferences,
}

/// External routing service.
///
/// Implementations report a non-success response as `AppError::UpstreamService`
/// and a successful response without a usable path as `AppError::NoRouteFound`.
#[async_trait]
pub trait RoutingEngine: Send + Sync {
    /// Route through `waypoints` in order
    async fn walking_route(&self, waypoints: &[Coordinates]) -> Result<RouteCandidate>;

    /// Let the engine build a loop of roughly `length_meters` from `start`
    async fn round_trip_route(&self, request: &RoundTripRequest) -> Result<RouteCandidate>;

    /// Fails with `AppError::Misconfiguration` when the engine cannot be called at all
    fn ensure_configured(&self) -> Result<()> {
        Ok(())
    }
}
