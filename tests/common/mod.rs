use async_trait::async_trait;
use route_random::config::RouteGeneratorConfig;
use route_random::error::{AppError, Result};
use route_random::models::{Coordinates, RouteCandidate};
use route_random::services::route_generator::RouteGenerator;
use route_random::services::routing::{RoundTripRequest, RoutingEngine};
use route_random::AppState;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Routing engine stub that replays scripted responses in order and records every call.
///
/// Once a script runs dry, further calls fail with `NoRouteFound`.
#[derive(Default)]
pub struct ScriptedEngine {
    round_trips: Mutex<VecDeque<Result<RouteCandidate>>>,
    walking: Mutex<VecDeque<Result<RouteCandidate>>>,
    round_trip_calls: Mutex<Vec<RoundTripRequest>>,
    walking_calls: Mutex<Vec<Vec<Coordinates>>>,
    unconfigured: bool,
    panicking: bool,
}

#[allow(dead_code)]
impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unconfigured() -> Self {
        Self {
            unconfigured: true,
            ..Self::default()
        }
    }

    /// Engine whose routing calls panic, as a bug in an adapter would
    pub fn panicking() -> Self {
        Self {
            panicking: true,
            ..Self::default()
        }
    }

    pub fn with_round_trips(self, responses: Vec<Result<RouteCandidate>>) -> Self {
        *self.round_trips.lock().unwrap() = responses.into();
        self
    }

    pub fn with_walking(self, responses: Vec<Result<RouteCandidate>>) -> Self {
        *self.walking.lock().unwrap() = responses.into();
        self
    }

    pub fn round_trip_calls(&self) -> Vec<RoundTripRequest> {
        self.round_trip_calls.lock().unwrap().clone()
    }

    pub fn walking_calls(&self) -> Vec<Vec<Coordinates>> {
        self.walking_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RoutingEngine for ScriptedEngine {
    async fn walking_route(&self, waypoints: &[Coordinates]) -> Result<RouteCandidate> {
        self.walking_calls.lock().unwrap().push(waypoints.to_vec());
        if self.panicking {
            panic!("walking route handler crashed");
        }
        self.walking
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::NoRouteFound("script exhausted".to_string())))
    }

    async fn round_trip_route(&self, request: &RoundTripRequest) -> Result<RouteCandidate> {
        self.round_trip_calls.lock().unwrap().push(request.clone());
        if self.panicking {
            panic!("round trip handler crashed");
        }
        self.round_trips
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::NoRouteFound("script exhausted".to_string())))
    }

    fn ensure_configured(&self) -> Result<()> {
        if self.unconfigured {
            Err(AppError::Misconfiguration("ORS_API_KEY is not set".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Paris, used as the start of every scripted search
#[allow(dead_code)]
pub fn paris() -> Coordinates {
    Coordinates::new(48.8566, 2.3522).unwrap()
}

/// Candidate with a short closed path around Paris and the given length
#[allow(dead_code)]
pub fn candidate(distance_meters: f64) -> RouteCandidate {
    let start = paris();
    let path = vec![
        start,
        Coordinates::new(48.8600, 2.3522).unwrap(),
        Coordinates::new(48.8600, 2.3600).unwrap(),
        Coordinates::new(48.8566, 2.3600).unwrap(),
        start,
    ];
    RouteCandidate::new(path, distance_meters)
}

#[allow(dead_code)]
pub fn upstream_error() -> AppError {
    AppError::UpstreamService("ORS returned 502 Bad Gateway".to_string())
}

#[allow(dead_code)]
pub fn generator(engine: Arc<ScriptedEngine>) -> RouteGenerator {
    RouteGenerator::new(engine, RouteGeneratorConfig::default())
}

/// App state around a scripted engine, without a cache
#[allow(dead_code)]
pub fn test_state(engine: Arc<ScriptedEngine>) -> Arc<AppState> {
    Arc::new(AppState {
        route_generator: generator(engine),
        cache: None,
        search_timeout: Duration::from_secs(5),
    })
}

/// Check if we should skip real API tests
#[allow(dead_code)]
pub fn should_skip_real_api_tests() -> bool {
    std::env::var("SKIP_REAL_API_TESTS").is_ok() || std::env::var("ORS_API_KEY").is_err()
}
