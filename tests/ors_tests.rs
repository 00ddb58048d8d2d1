use route_random::config::RouteGeneratorConfig;
use route_random::error::AppError;
use route_random::models::{Coordinates, RoutePreferences, SearchOptions, TargetSpec};
use route_random::services::ors::OrsClient;
use route_random::services::route_generator::RouteGenerator;
use route_random::services::routing::{RoundTripRequest, RoutingEngine};
use std::sync::Arc;

mod common;

fn client() -> OrsClient {
    let api_key = std::env::var("ORS_API_KEY").expect("ORS_API_KEY must be set for integration tests");
    OrsClient::new(Some(api_key))
}

#[tokio::test]
async fn test_ors_walking_directions() {
    if common::should_skip_real_api_tests() {
        println!("Skipping real API test");
        return;
    }

    // Eiffel Tower to Louvre
    let eiffel = Coordinates::new(48.8584, 2.2945).unwrap();
    let louvre = Coordinates::new(48.8606, 2.3376).unwrap();

    let result = client().walking_route(&[eiffel, louvre]).await;
    assert!(result.is_ok(), "ORS call should succeed: {:?}", result.err());

    let route = result.unwrap();
    assert!(!route.coordinates.is_empty(), "Geometry should not be empty");

    // Walking from Eiffel to Louvre should be ~3-5km
    let distance_km = route.distance_km();
    assert!(
        distance_km > 2.0 && distance_km < 7.0,
        "Distance should be reasonable: got {}km",
        distance_km
    );
}

#[tokio::test]
async fn test_ors_round_trip_is_closed() {
    if common::should_skip_real_api_tests() {
        println!("Skipping real API test");
        return;
    }

    let start = Coordinates::new(48.8566, 2.3522).unwrap();
    let request = RoundTripRequest {
        start,
        length_meters: 3900.0,
        points: 5,
        seed: Some(42),
        preferences: RoutePreferences::default(),
    };

    let route = client().round_trip_route(&request).await.unwrap();

    assert!(route.distance_meters > 1000.0);
    let first = route.coordinates.first().unwrap();
    let last = route.coordinates.last().unwrap();
    assert!(first.distance_to(last) < 0.1, "Loop should end near its start");
}

#[tokio::test]
async fn test_ors_full_search() {
    if common::should_skip_real_api_tests() {
        println!("Skipping real API test");
        return;
    }

    let generator = RouteGenerator::new(Arc::new(client()), RouteGeneratorConfig::default());
    let target = TargetSpec::new(Coordinates::new(48.8566, 2.3522).unwrap(), 5000.0)
        .unwrap()
        .with_seed(Some(1));

    let route = generator
        .generate(&target, &SearchOptions::default())
        .await
        .unwrap();

    assert!(route.attempts >= 1);
    assert!(!route.coordinates.is_empty());
}

#[tokio::test]
async fn test_ors_without_key_is_misconfigured() {
    let client = OrsClient::new(None);
    let start = Coordinates::new(48.8566, 2.3522).unwrap();

    assert!(matches!(
        client.ensure_configured(),
        Err(AppError::Misconfiguration(_))
    ));
    assert!(matches!(
        client.walking_route(&[start, start]).await,
        Err(AppError::Misconfiguration(_))
    ));
}
