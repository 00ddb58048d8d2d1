use super::target_params::radius_km;
use crate::constants::EARTH_RADIUS_KM;
use crate::error::{AppError, Result};
use crate::models::coordinates::normalize_longitude;
use crate::models::Coordinates;
use std::f64::consts::TAU;

/// Build a closed ring of waypoints around `start`.
///
/// The ring radius is chosen so that its circumference equals the target distance
/// scaled by `correction_factor`. Points sit at equal bearings, the first one at
/// `TAU / ring_point_count`, and the ring is returned as
/// `[start, p1, .., pN, start]`.
pub fn generate_ring(
    start: Coordinates,
    target_distance_meters: f64,
    ring_point_count: usize,
    correction_factor: f64,
) -> Result<Vec<Coordinates>> {
    if !target_distance_meters.is_finite() || target_distance_meters <= 0.0 {
        return Err(AppError::InvalidRequest(format!(
            "Target distance must be positive, got {}m",
            target_distance_meters
        )));
    }

    let radius = radius_km(target_distance_meters / 1000.0, correction_factor);
    let angular_distance = radius / EARTH_RADIUS_KM;

    let lat1 = start.lat.to_radians();
    let lng1 = start.lng.to_radians();

    let mut ring = Vec::with_capacity(ring_point_count + 2);
    ring.push(start);

    for i in 1..=ring_point_count {
        let bearing = TAU * i as f64 / ring_point_count as f64;
        ring.push(destination_point(lat1, lng1, angular_distance, bearing));
    }

    ring.push(start);
    Ok(ring)
}

/// Great-circle destination from (`lat1`, `lng1`) in radians after travelling
/// `angular_distance` radians along `bearing`
fn destination_point(lat1: f64, lng1: f64, angular_distance: f64, bearing: f64) -> Coordinates {
    let lat2 = (lat1.sin() * angular_distance.cos()
        + lat1.cos() * angular_distance.sin() * bearing.cos())
    .asin();
    let lng2 = lng1
        + (bearing.sin() * angular_distance.sin() * lat1.cos())
            .atan2(angular_distance.cos() - lat1.sin() * lat2.sin());

    Coordinates {
        lat: lat2.to_degrees(),
        lng: normalize_longitude(lng2.to_degrees()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris() -> Coordinates {
        Coordinates::new(48.8566, 2.3522).unwrap()
    }

    #[test]
    fn test_ring_is_closed_with_expected_length() {
        for count in [3, 5, 8, 12] {
            let ring = generate_ring(paris(), 5000.0, count, 0.65).unwrap();
            assert_eq!(ring.len(), count + 2);
            assert_eq!(ring[0], paris());
            assert_eq!(ring[ring.len() - 1], paris());
        }
    }

    #[test]
    fn test_ring_points_lie_on_radius() {
        let ring = generate_ring(paris(), 10_000.0, 6, 0.65).unwrap();
        let expected_km = radius_km(10.0, 0.65);

        for point in &ring[1..ring.len() - 1] {
            let actual_km = paris().distance_to(point);
            let relative = (actual_km - expected_km).abs() / expected_km;
            assert!(
                relative < 1e-6,
                "point {:?} is {}km from start, expected {}km",
                point,
                actual_km,
                expected_km
            );
        }
    }

    #[test]
    fn test_first_bearing_is_one_step_clockwise_from_north() {
        // With four points the first lands due east and the last due north
        let ring = generate_ring(paris(), 8000.0, 4, 0.65).unwrap();
        let east = ring[1];
        let north = ring[4];

        assert!(east.lng > paris().lng);
        assert!((east.lat - paris().lat).abs() < 1e-3);
        assert!(north.lat > paris().lat);
        assert!((north.lng - paris().lng).abs() < 1e-9);
    }

    #[test]
    fn test_ring_is_deterministic() {
        let first = generate_ring(paris(), 7300.0, 7, 0.72).unwrap();
        let second = generate_ring(paris(), 7300.0, 7, 0.72).unwrap();

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.lat.to_bits(), b.lat.to_bits());
            assert_eq!(a.lng.to_bits(), b.lng.to_bits());
        }
    }

    #[test]
    fn test_non_positive_distance_is_rejected() {
        assert!(matches!(
            generate_ring(paris(), 0.0, 5, 0.65),
            Err(AppError::InvalidRequest(_))
        ));
        assert!(matches!(
            generate_ring(paris(), -1.0, 5, 0.65),
            Err(AppError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_degenerate_point_counts_are_permitted() {
        let ring = generate_ring(paris(), 3000.0, 2, 0.65).unwrap();
        assert_eq!(ring.len(), 4);

        let ring = generate_ring(paris(), 3000.0, 0, 0.65).unwrap();
        assert_eq!(ring, vec![paris(), paris()]);
    }

    #[test]
    fn test_ring_near_antimeridian_stays_in_range() {
        let start = Coordinates::new(-16.5, 179.99).unwrap();
        let ring = generate_ring(start, 20_000.0, 8, 0.65).unwrap();

        for point in &ring {
            assert!(Coordinates::new(point.lat, point.lng).is_ok());
        }
        assert!(ring.iter().any(|p| p.lng < 0.0));
    }
}
