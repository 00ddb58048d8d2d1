use crate::cache::{CacheStats, RouteCache};
use crate::models::FinalRoute;
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Process-local store for seeded loop results.
///
/// A seeded request always produces the same loop, so its `FinalRoute` is kept for
/// `loop_ttl_seconds` and handed back as-is, route id included. The store holds at
/// most `max_loops` results.
pub struct MemoryCacheService {
    loops: Cache<String, Arc<FinalRoute>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryCacheService {
    pub fn new(loop_ttl_seconds: u64, max_loops: u64) -> Self {
        let loops = Cache::builder()
            .time_to_live(Duration::from_secs(loop_ttl_seconds))
            .max_capacity(max_loops)
            .build();

        MemoryCacheService {
            loops,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn hit_rate(hits: u64, misses: u64) -> f64 {
        match hits + misses {
            0 => 0.0,
            lookups => hits as f64 * 100.0 / lookups as f64,
        }
    }
}

#[async_trait]
impl RouteCache for MemoryCacheService {
    async fn get_cached_route(&self, key: &str) -> Option<FinalRoute> {
        let Some(route) = self.loops.get(key).await else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(key, "No stored loop for seeded request");
            return None;
        };

        self.hits.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            key,
            strategy = ?route.strategy,
            distance_m = %format!("{:.0}", route.distance_meters),
            "Reusing stored loop {}",
            route.id
        );
        Some(FinalRoute::clone(&route))
    }

    async fn cache_route(&self, key: &str, route: &FinalRoute) {
        tracing::debug!(
            key,
            strategy = ?route.strategy,
            attempts = route.attempts,
            distance_m = %format!("{:.0}", route.distance_meters),
            "Storing loop {} for seeded request",
            route.id
        );
        self.loops
            .insert(key.to_owned(), Arc::new(route.clone()))
            .await;
    }

    async fn get_stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);

        CacheStats {
            hits,
            misses,
            hit_rate: Self::hit_rate(hits, misses),
            entries: self.loops.entry_count(),
        }
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
