// Library exports for testing and reusability

pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use error::{AppError, Result};

use cache::RouteCache;
use services::route_generator::RouteGenerator;
use std::sync::Arc;
use std::time::Duration;

// App state for sharing across the application
pub struct AppState {
    pub route_generator: RouteGenerator,
    pub cache: Option<Arc<dyn RouteCache>>,
    /// Upper bound on one whole search, all engine calls included
    pub search_timeout: Duration,
}
