//! Stable application-wide constants.
//!
//! Values here are structural invariants, empirically tuned search coefficients, and
//! default fallbacks for env-var-based configuration. The tuning tables are kept
//! verbatim for behavioral compatibility; they are not derived from a model.
//! Runtime overrides go through [`RouteGeneratorConfig`](crate::config::RouteGeneratorConfig).

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "3000";
/// Default wall-clock budget for a whole route search (seconds).
pub const DEFAULT_SEARCH_TIMEOUT_SECONDS: u64 = 60;

// --- OpenRouteService defaults ---

/// Default ORS API root. Overridden by `ORS_BASE_URL`.
pub const DEFAULT_ORS_BASE_URL: &str = "https://api.openrouteservice.org";
/// Default ORS directions profile. Overridden by `ORS_PROFILE`.
pub const DEFAULT_ORS_PROFILE: &str = "foot-walking";
/// Default per-request timeout for ORS calls (seconds).
pub const DEFAULT_ORS_TIMEOUT_SECONDS: u64 = 30;
/// Round-trip point count used when the caller passes zero.
pub const DEFAULT_ROUND_TRIP_POINTS: usize = 6;
/// ORS rejects ordered-waypoint requests above this many coordinates.
pub const MAX_ROUTE_WAYPOINTS: usize = 50;

// --- Cache defaults ---

/// Default route cache TTL: 1 hour. Overridden by `ROUTE_CACHE_TTL`.
pub const DEFAULT_ROUTE_CACHE_TTL_SECONDS: u64 = 3_600;
/// Maximum entries for the in-memory route cache.
pub const DEFAULT_ROUTE_CACHE_MAX_ENTRIES: u64 = 1_000;

// --- Geometry ---

/// Mean Earth radius used by the spherical formulas.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

// --- Waypoint ring ---

/// Share of the target distance spent on the ring circumference. Real paths along
/// roads are longer than the chords between ring points.
pub const DEFAULT_CORRECTION_FACTOR: f64 = 0.65;
/// Lowest correction factor a caller may request.
pub const MIN_CORRECTION_FACTOR: f64 = 0.3;
/// Highest correction factor a caller may request.
pub const MAX_CORRECTION_FACTOR: f64 = 1.0;

// --- Ring point count ---

/// Point count at and below the first distance step.
pub const BASE_POINT_COUNT: usize = 5;
/// Every full step of this many km beyond the first adds one point.
pub const POINT_COUNT_STEP_KM: f64 = 5.0;
/// Smallest point count handed to the routing engine.
pub const MIN_POINT_COUNT: usize = 3;
/// Largest point count handed to the routing engine.
pub const MAX_POINT_COUNT: usize = 12;

// --- Distance tolerance ---

/// Tolerance as a share of the target distance.
pub const TOLERANCE_FRACTION: f64 = 0.10;
/// Floor on the tolerance (meters).
pub const MIN_TOLERANCE_METERS: f64 = 500.0;
/// Ceiling on the tolerance (meters).
pub const MAX_TOLERANCE_METERS: f64 = 2000.0;

// --- Round-trip search ---

/// Per-attempt scaling of the requested round-trip length, attempt 1 first.
/// Compensates for the engine overshooting on looped requests. The table length is
/// the attempt budget.
pub const ROUND_TRIP_CORRECTION_FACTORS: [f64; 3] = [0.78, 0.72, 0.68];
/// Targets shorter than this skip round-trip mode and go straight to the ring.
pub const ROUND_TRIP_MIN_DISTANCE_METERS: f64 = 2000.0;

// --- Request validation ---

/// Longest route a caller may request.
pub const MAX_TARGET_DISTANCE_KM: f64 = 100.0;
/// Overlap detection is quadratic; longer paths are refused.
pub const MAX_OVERLAP_PATH_POINTS: usize = 2_000;
