use crate::constants::{
    DEFAULT_ORS_BASE_URL, DEFAULT_ORS_PROFILE, DEFAULT_ORS_TIMEOUT_SECONDS,
    DEFAULT_ROUND_TRIP_POINTS, MAX_ROUTE_WAYPOINTS,
};
use crate::error::{AppError, Result};
use crate::models::{Coordinates, ElevationSummary, RouteCandidate, RoutePreferences};
use crate::services::routing::{RoundTripRequest, RoutingEngine};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ACCEPT_HEADER: &str =
    "application/json, application/geo+json, application/gpx+xml, img/png; charset=utf-8";

const EXTRA_INFO: [&str; 3] = ["surface", "waytype", "steepness"];

/// OpenRouteService directions client.
///
/// This is the only place where coordinates are swapped to the `[lng, lat]`
/// order ORS expects, and swapped back on the way out.
#[derive(Clone)]
pub struct OrsClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    profile: String,
}

impl OrsClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_config(
            api_key,
            DEFAULT_ORS_BASE_URL.to_string(),
            DEFAULT_ORS_PROFILE.to_string(),
            Duration::from_secs(DEFAULT_ORS_TIMEOUT_SECONDS),
        )
    }

    pub fn with_config(
        api_key: Option<String>,
        base_url: String,
        profile: String,
        timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build ORS HTTP client with timeout: {}", e);
                Client::new()
            });

        OrsClient {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            profile,
        }
    }

    fn directions_url(&self) -> String {
        format!("{}/v2/directions/{}/geojson", self.base_url, self.profile)
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::Misconfiguration("ORS_API_KEY is not set".to_string()))
    }

    async fn post_directions(&self, body: &DirectionsRequest) -> Result<RouteCandidate> {
        let api_key = self.api_key()?;

        let response = self
            .client
            .post(self.directions_url())
            .header(reqwest::header::ACCEPT, ACCEPT_HEADER)
            .header(reqwest::header::AUTHORIZATION, api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::UpstreamService(format!("Request timed out: {}", e))
                } else {
                    AppError::UpstreamService(format!("Request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(
                status = %status,
                waypoints = body.coordinates.len(),
                "ORS API HTTP error {}: {}",
                status, error_text
            );
            return Err(AppError::UpstreamService(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let directions: OrsDirectionsResponse = response
            .json()
            .await
            .map_err(|e| AppError::UpstreamService(format!("Failed to parse response: {}", e)))?;

        let candidate = directions.into_candidate()?;
        tracing::debug!(
            distance_km = %format!("{:.2}", candidate.distance_km()),
            path_points = candidate.coordinates.len(),
            "ORS response: {:.2}km, {} path points",
            candidate.distance_km(), candidate.coordinates.len()
        );
        Ok(candidate)
    }
}

#[async_trait]
impl RoutingEngine for OrsClient {
    async fn walking_route(&self, waypoints: &[Coordinates]) -> Result<RouteCandidate> {
        if waypoints.len() < 2 {
            return Err(AppError::InvalidRequest(
                "At least 2 waypoints required".to_string(),
            ));
        }
        if waypoints.len() > MAX_ROUTE_WAYPOINTS {
            return Err(AppError::InvalidRequest(format!(
                "Maximum {} waypoints allowed",
                MAX_ROUTE_WAYPOINTS
            )));
        }

        tracing::debug!(
            waypoints = waypoints.len(),
            profile = %self.profile,
            "ORS ordered-waypoints request: {} waypoints",
            waypoints.len()
        );
        self.post_directions(&DirectionsRequest::waypoints(waypoints))
            .await
    }

    async fn round_trip_route(&self, request: &RoundTripRequest) -> Result<RouteCandidate> {
        let seed = request
            .seed
            .unwrap_or_else(|| rand::random_range(0..100_000));
        let body = DirectionsRequest::round_trip(request, seed);

        tracing::debug!(
            length_m = %format!("{:.0}", request.length_meters),
            points = request.points,
            seed = seed,
            "ORS round-trip request: {:.0}m, {} points, seed {}",
            request.length_meters, request.points, seed
        );
        self.post_directions(&body).await
    }

    fn ensure_configured(&self) -> Result<()> {
        self.api_key().map(|_| ())
    }
}

// ORS request types

#[derive(Debug, Serialize)]
struct DirectionsRequest {
    /// `[lng, lat]` pairs
    coordinates: Vec<[f64; 2]>,
    preference: &'static str,
    elevation: bool,
    extra_info: [&'static str; 3],
    #[serde(skip_serializing_if = "Option::is_none")]
    continue_straight: Option<bool>,
    options: DirectionsOptions,
}

#[derive(Debug, Serialize)]
struct DirectionsOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    round_trip: Option<RoundTripOptions>,
    avoid_features: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
struct RoundTripOptions {
    length: f64,
    points: usize,
    seed: u32,
}

impl DirectionsRequest {
    fn waypoints(waypoints: &[Coordinates]) -> Self {
        DirectionsRequest {
            coordinates: waypoints.iter().map(|c| [c.lng, c.lat]).collect(),
            preference: "recommended",
            elevation: true,
            extra_info: EXTRA_INFO,
            continue_straight: Some(true),
            options: DirectionsOptions {
                round_trip: None,
                avoid_features: vec!["ferries", "steps"],
            },
        }
    }

    fn round_trip(request: &RoundTripRequest, seed: u32) -> Self {
        let points = if request.points == 0 {
            DEFAULT_ROUND_TRIP_POINTS
        } else {
            request.points
        };

        DirectionsRequest {
            coordinates: vec![[request.start.lng, request.start.lat]],
            preference: "recommended",
            elevation: true,
            extra_info: EXTRA_INFO,
            continue_straight: None,
            options: DirectionsOptions {
                round_trip: Some(RoundTripOptions {
                    length: request.length_meters.round(),
                    points: request.preferences.complexity.adjust_point_count(points),
                    seed,
                }),
                avoid_features: avoid_features(&request.preferences),
            },
        }
    }
}

/// `avoid_unpaved` has no counterpart in the foot profiles and is not forwarded.
fn avoid_features(preferences: &RoutePreferences) -> Vec<&'static str> {
    let mut features = vec!["ferries"];
    if preferences.avoid_steps {
        features.push("steps");
    }
    if preferences.avoid_highways {
        features.push("highways");
    }
    features
}

// ORS response types

#[derive(Debug, Deserialize)]
struct OrsDirectionsResponse {
    #[serde(default)]
    features: Vec<OrsFeature>,
}

#[derive(Debug, Deserialize)]
struct OrsFeature {
    properties: OrsProperties,
    geometry: OrsGeometry,
}

#[derive(Debug, Deserialize)]
struct OrsProperties {
    #[serde(default)]
    segments: Vec<OrsSegment>,
}

#[derive(Debug, Deserialize)]
struct OrsSegment {
    #[serde(default)]
    distance: f64,
    ascent: Option<f64>,
    descent: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OrsGeometry {
    /// `[lng, lat]` or `[lng, lat, elevation]` positions
    coordinates: Vec<Vec<f64>>,
}

impl OrsDirectionsResponse {
    fn into_candidate(self) -> Result<RouteCandidate> {
        let feature = self
            .features
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NoRouteFound("Response contained no features".to_string()))?;

        let coordinates = feature
            .geometry
            .coordinates
            .iter()
            .enumerate()
            .map(|(index, position)| match position.as_slice() {
                [lng, lat, ..] => Coordinates::new(*lat, *lng)
                    .map_err(|e| format!("position {}: {}", index, e)),
                _ => Err(format!("position {} has {} components", index, position.len())),
            })
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| {
                tracing::warn!(error = %e, "ORS returned an invalid route geometry");
                AppError::UpstreamService(format!("Invalid route geometry: {}", e))
            })?;

        if coordinates.is_empty() {
            return Err(AppError::NoRouteFound(
                "Route geometry contained no valid positions".to_string(),
            ));
        }

        let distance_meters = feature.properties.segments.iter().map(|s| s.distance).sum();
        let elevation = elevation_summary(&feature.properties.segments, &feature.geometry);

        Ok(RouteCandidate {
            coordinates,
            distance_meters,
            elevation,
        })
    }
}

/// Gain/loss come from segment ascent/descent, the profile from the third
/// position component. `None` when ORS returned neither.
fn elevation_summary(segments: &[OrsSegment], geometry: &OrsGeometry) -> Option<ElevationSummary> {
    let profile: Vec<f64> = geometry
        .coordinates
        .iter()
        .filter_map(|position| position.get(2).copied())
        .collect();
    let gain: f64 = segments.iter().filter_map(|s| s.ascent).sum();
    let loss: f64 = segments.iter().filter_map(|s| s.descent).sum();

    if gain <= 0.0 && loss <= 0.0 && profile.is_empty() {
        return None;
    }

    let min = profile.iter().copied().fold(f64::INFINITY, f64::min);
    let max = profile.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(ElevationSummary {
        gain: gain.round(),
        loss: loss.round(),
        min: if min.is_finite() { min.round() } else { 0.0 },
        max: if max.is_finite() { max.round() } else { 0.0 },
        profile,
    })
}
