use crate::models::{Coordinates, LocationInput};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;
use uuid::Uuid;

/// Travel pace used to turn a duration into a distance
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    #[default]
    Walking,
    Running,
    Cycling,
}

impl Pace {
    /// Fixed speed for this pace in km/h
    pub fn speed_kmh(&self) -> f64 {
        match self {
            Pace::Walking => 5.0,
            Pace::Running => 10.0,
            Pace::Cycling => 15.0,
        }
    }
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pace::Walking => write!(f, "walking"),
            Pace::Running => write!(f, "running"),
            Pace::Cycling => write!(f, "cycling"),
        }
    }
}

impl FromStr for Pace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "walk" | "walking" => Ok(Pace::Walking),
            "run" | "running" => Ok(Pace::Running),
            "bike" | "cycling" | "bicycle" => Ok(Pace::Cycling),
            _ => Err(format!("Invalid pace: '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    #[default]
    Moderate,
    Complex,
}

impl Complexity {
    /// Shift the round-trip point count: fewer turns for simple loops, more for complex ones
    pub fn adjust_point_count(&self, points: usize) -> usize {
        match self {
            Complexity::Simple => points.saturating_sub(2).max(3),
            Complexity::Moderate => points,
            Complexity::Complex => (points + 3).min(12),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct RoutePreferences {
    #[serde(default)]
    pub avoid_steps: bool,
    #[serde(default)]
    pub avoid_highways: bool,
    #[serde(default)]
    pub avoid_unpaved: bool,
    #[serde(default)]
    pub complexity: Complexity,
}

/// What the caller asked for, fixed for the duration of one search
#[derive(Debug, Clone, PartialEq)]
pub struct TargetSpec {
    pub start: Coordinates,
    pub target_distance_meters: f64,
    pub preferences: RoutePreferences,
    pub seed: Option<u32>,
}

impl TargetSpec {
    pub fn new(start: Coordinates, target_distance_meters: f64) -> Result<Self, String> {
        if !target_distance_meters.is_finite() || target_distance_meters <= 0.0 {
            return Err(format!(
                "Target distance must be positive, got {}m",
                target_distance_meters
            ));
        }
        Ok(TargetSpec {
            start,
            target_distance_meters,
            preferences: RoutePreferences::default(),
            seed: None,
        })
    }

    pub fn with_preferences(mut self, preferences: RoutePreferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn with_seed(mut self, seed: Option<u32>) -> Self {
        self.seed = seed;
        self
    }

    pub fn target_distance_km(&self) -> f64 {
        self.target_distance_meters / 1000.0
    }
}

/// Caller overrides that steer the search without changing the target
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SearchOptions {
    /// Ring correction factor for the fallback path
    pub correction_factor: Option<f64>,
    /// Force round-trip mode on or off; `None` keeps the configured behaviour
    pub round_trip: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElevationSummary {
    pub gain: f64,
    pub loss: f64,
    pub min: f64,
    pub max: f64,
    pub profile: Vec<f64>,
}

/// One path returned by the routing engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteCandidate {
    pub coordinates: Vec<Coordinates>,
    pub distance_meters: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation: Option<ElevationSummary>,
}

impl RouteCandidate {
    pub fn new(coordinates: Vec<Coordinates>, distance_meters: f64) -> Self {
        RouteCandidate {
            coordinates,
            distance_meters,
            elevation: None,
        }
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchAttemptResult {
    pub candidate: RouteCandidate,
    pub absolute_distance_error: f64,
    pub within_tolerance: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RouteStrategy {
    /// Engine-native round trip, accepted in tolerance or best of the attempts
    RoundTrip,
    /// Ordered waypoints on a spherical ring around the start
    WaypointRing,
    /// Caller-supplied waypoints routed verbatim
    Regenerated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalRoute {
    pub id: Uuid,
    pub coordinates: Vec<Coordinates>,
    pub distance_meters: f64,
    /// Waypoints the path was derived from (resampled for round trips)
    pub waypoints: Vec<Coordinates>,
    pub strategy: RouteStrategy,
    /// Engine calls that returned a route or failed for this result
    pub attempts: usize,
    pub within_tolerance: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_distance_meters: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation: Option<ElevationSummary>,
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
}

impl FinalRoute {
    pub fn new(
        candidate: RouteCandidate,
        waypoints: Vec<Coordinates>,
        strategy: RouteStrategy,
        attempts: usize,
    ) -> Self {
        FinalRoute {
            id: Uuid::new_v4(),
            coordinates: candidate.coordinates,
            distance_meters: candidate.distance_meters,
            waypoints,
            strategy,
            attempts,
            within_tolerance: false,
            target_distance_meters: None,
            elevation: candidate.elevation,
            generated_at: OffsetDateTime::now_utc(),
        }
    }

    /// Record the target and whether the route landed within `tolerance_m` of it
    pub fn with_target(mut self, target_distance_meters: f64, tolerance_m: f64) -> Self {
        self.within_tolerance = (self.distance_meters - target_distance_meters).abs() <= tolerance_m;
        self.target_distance_meters = Some(target_distance_meters);
        self
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }
}

// Request/Response types for API endpoints

#[derive(Debug, Deserialize)]
pub struct GenerateRouteRequest {
    #[serde(default)]
    pub start_location: Option<LocationInput>,
    #[serde(default)]
    pub distance_km: Option<f64>,
    #[serde(default)]
    pub duration_minutes: Option<f64>,
    #[serde(default)]
    pub pace: Pace,
    #[serde(default)]
    pub correction_factor: Option<f64>,
    #[serde(default)]
    pub waypoints: Option<Vec<LocationInput>>,
    #[serde(default)]
    pub regenerate: bool,
    #[serde(default)]
    pub round_trip: Option<bool>,
    #[serde(default)]
    pub seed: Option<u32>,
    #[serde(default)]
    pub preferences: RoutePreferences,
}

impl GenerateRouteRequest {
    /// Explicit waypoints when the caller asked for a regeneration
    pub fn regeneration_waypoints(&self) -> Option<Result<Vec<Coordinates>, String>> {
        if !self.regenerate {
            return None;
        }
        let waypoints = self.waypoints.as_ref()?;
        Some(
            waypoints
                .iter()
                .map(|w| w.to_coordinates())
                .collect::<Result<Vec<_>, _>>(),
        )
    }

    pub fn start(&self) -> Result<Coordinates, String> {
        self.start_location
            .ok_or_else(|| "Starting location is required".to_string())?
            .to_coordinates()
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            correction_factor: self.correction_factor,
            round_trip: self.round_trip,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateRouteResponse {
    pub success: bool,
    pub route: FinalRoute,
    pub estimated_duration_minutes: u32,
}

#[derive(Debug, Deserialize)]
pub struct SegmentsRequest {
    pub coordinates: Vec<LocationInput>,
}

impl SegmentsRequest {
    /// The path as validated coordinates, rejecting any out-of-range point
    pub fn path(&self) -> Result<Vec<Coordinates>, String> {
        self.coordinates
            .iter()
            .enumerate()
            .map(|(index, point)| {
                point
                    .to_coordinates()
                    .map_err(|e| format!("coordinates[{}]: {}", index, e))
            })
            .collect()
    }
}
