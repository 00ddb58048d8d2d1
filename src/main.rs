use axum::Router;
use route_random::cache::{MemoryCacheService, RouteCache};
use route_random::config::Config;
use route_random::services::ors::OrsClient;
use route_random::services::route_generator::RouteGenerator;
use route_random::services::routing::RoutingEngine;
use route_random::AppState;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "route_random=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting Route Random API server");
    tracing::info!("Configuration loaded successfully");

    if config.ors_api_key.is_none() {
        tracing::warn!("ORS_API_KEY is not set; route requests will fail until it is configured");
    }

    let cache: Arc<dyn RouteCache> = Arc::new(MemoryCacheService::new(
        config.route_cache_ttl,
        config.route_cache_max_entries,
    ));

    // Initialize services
    let engine: Arc<dyn RoutingEngine> = Arc::new(OrsClient::with_config(
        config.ors_api_key.clone(),
        config.ors_base_url.clone(),
        config.ors_profile.clone(),
        Duration::from_secs(config.ors_timeout_secs),
    ));
    tracing::info!(
        base_url = %config.ors_base_url,
        profile = %config.ors_profile,
        "Routing engine: openrouteservice"
    );
    let route_generator = RouteGenerator::new(engine, config.route_generator.clone());

    // Create application state
    let state = Arc::new(AppState {
        route_generator,
        cache: Some(cache),
        search_timeout: Duration::from_secs(config.search_timeout_secs),
    });

    // Build router with CORS and tracing
    let app = Router::new()
        .nest("/api/v1", route_random::routes::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
