mod memory;

pub use memory::MemoryCacheService;

use crate::models::{FinalRoute, SearchOptions, TargetSpec};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Storage for generated routes, keyed by `route_cache_key`
#[async_trait]
pub trait RouteCache: Send + Sync {
    async fn get_cached_route(&self, key: &str) -> Option<FinalRoute>;
    async fn cache_route(&self, key: &str, route: &FinalRoute);
    async fn get_stats(&self) -> CacheStats;
    fn backend_name(&self) -> &'static str;
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub entries: u64,
}

/// Cache key for a generate request, or `None` when the request is unseeded.
///
/// Unseeded searches draw a random engine seed, so their results are never reused.
/// The key covers the start (5 decimal places), target (whole metres), seed,
/// round-trip toggle, correction factor and preferences.
pub fn route_cache_key(target: &TargetSpec, options: &SearchOptions) -> Option<String> {
    let seed = target.seed?;
    let mut hasher = DefaultHasher::new();

    let start = target.start.round(5);
    let distance_m = target.target_distance_meters.round() as i64;
    let correction_factor = options
        .correction_factor
        .map(|factor| (factor * 10_000.0).round() as i64);

    start.lat.to_bits().hash(&mut hasher);
    start.lng.to_bits().hash(&mut hasher);
    distance_m.hash(&mut hasher);
    seed.hash(&mut hasher);
    options.round_trip.hash(&mut hasher);
    correction_factor.hash(&mut hasher);
    target.preferences.hash(&mut hasher);

    Some(format!("route:loop:{:x}", hasher.finish()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Complexity, Coordinates, RoutePreferences};

    fn target(lat: f64, lng: f64, meters: f64, seed: Option<u32>) -> TargetSpec {
        TargetSpec::new(Coordinates::new(lat, lng).unwrap(), meters)
            .unwrap()
            .with_seed(seed)
    }

    #[test]
    fn test_unseeded_requests_are_not_cached() {
        let options = SearchOptions::default();
        assert!(route_cache_key(&target(48.8566, 2.3522, 5000.0, None), &options).is_none());
    }

    #[test]
    fn test_key_consistency() {
        let options = SearchOptions::default();
        let key1 = route_cache_key(&target(48.8566, 2.3522, 5000.0, Some(42)), &options);
        let key2 = route_cache_key(&target(48.8566, 2.3522, 5000.0, Some(42)), &options);
        assert!(key1.is_some());
        assert_eq!(key1, key2);
    }

    #[test]
    fn test_key_coordinate_precision() {
        let options = SearchOptions::default();
        let key1 = route_cache_key(&target(48.856_600, 2.3522, 5000.0, Some(1)), &options);
        let key2 = route_cache_key(&target(48.856_601, 2.3522, 5000.0, Some(1)), &options);
        let key3 = route_cache_key(&target(48.856_700, 2.3522, 5000.0, Some(1)), &options);
        assert_eq!(key1, key2);
        assert_ne!(key1, key3);
    }

    #[test]
    fn test_key_varies_with_inputs() {
        let base = route_cache_key(
            &target(48.8566, 2.3522, 5000.0, Some(1)),
            &SearchOptions::default(),
        );

        let other_seed = route_cache_key(
            &target(48.8566, 2.3522, 5000.0, Some(2)),
            &SearchOptions::default(),
        );
        let other_distance = route_cache_key(
            &target(48.8566, 2.3522, 6000.0, Some(1)),
            &SearchOptions::default(),
        );
        let no_round_trip = route_cache_key(
            &target(48.8566, 2.3522, 5000.0, Some(1)),
            &SearchOptions {
                round_trip: Some(false),
                ..Default::default()
            },
        );
        let complex = route_cache_key(
            &target(48.8566, 2.3522, 5000.0, Some(1)).with_preferences(RoutePreferences {
                complexity: Complexity::Complex,
                ..Default::default()
            }),
            &SearchOptions::default(),
        );

        assert_ne!(base, other_seed);
        assert_ne!(base, other_distance);
        assert_ne!(base, no_round_trip);
        assert_ne!(base, complex);
    }
}
