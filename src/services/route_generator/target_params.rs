//! Derived search parameters: ring size, point count, tolerance and
//! duration/distance conversions.

use crate::constants::*;
use crate::models::Pace;
use std::f64::consts::TAU;

/// Ring radius (km) whose circumference is the corrected target distance
pub fn radius_km(distance_km: f64, correction_factor: f64) -> f64 {
    distance_km * correction_factor / TAU
}

/// Waypoint count for a loop of `distance_km`.
///
/// Starts at 5 and adds one for every full 5 km beyond the first 5 km, within [3, 12].
pub fn point_count_for_distance(distance_km: f64) -> usize {
    let extra_km = (distance_km - POINT_COUNT_STEP_KM).max(0.0);
    // NaN input falls through `max` as 0
    let extra_points = (extra_km / POINT_COUNT_STEP_KM).floor() as usize;
    BASE_POINT_COUNT
        .saturating_add(extra_points)
        .clamp(MIN_POINT_COUNT, MAX_POINT_COUNT)
}

pub fn distance_from_duration(minutes: f64, pace: Pace) -> f64 {
    pace.speed_kmh() * minutes / 60.0
}

pub fn duration_from_distance(distance_km: f64, pace: Pace) -> f64 {
    distance_km / pace.speed_kmh() * 60.0
}

/// Acceptable absolute distance error for a target, 10% clamped to [500m, 2000m]
pub fn tolerance_meters(target_distance_meters: f64) -> f64 {
    tolerance_meters_with(
        target_distance_meters,
        TOLERANCE_FRACTION,
        MIN_TOLERANCE_METERS,
        MAX_TOLERANCE_METERS,
    )
}

pub fn tolerance_meters_with(
    target_distance_meters: f64,
    fraction: f64,
    min_meters: f64,
    max_meters: f64,
) -> f64 {
    (target_distance_meters * fraction).clamp(min_meters, max_meters)
}

/// Resolve the target distance (km) from either an explicit distance or a
/// duration at a pace
pub fn resolve_target_km(
    distance_km: Option<f64>,
    duration_minutes: Option<f64>,
    pace: Pace,
) -> Result<f64, String> {
    let km = match (distance_km, duration_minutes) {
        (Some(_), Some(_)) => {
            return Err("Provide either distance_km or duration_minutes, not both".to_string())
        }
        (Some(km), None) => km,
        (None, Some(minutes)) => {
            if !minutes.is_finite() || minutes <= 0.0 {
                return Err("Valid duration is required".to_string());
            }
            distance_from_duration(minutes, pace)
        }
        (None, None) => return Err("Valid distance is required".to_string()),
    };

    if !km.is_finite() || km <= 0.0 {
        return Err("Valid distance is required".to_string());
    }
    if km > MAX_TARGET_DISTANCE_KM {
        return Err(format!(
            "Distance must not exceed {}km, got {:.1}km",
            MAX_TARGET_DISTANCE_KM, km
        ));
    }
    Ok(km)
}

/// Check a caller-supplied ring correction factor
pub fn validate_correction_factor(factor: f64) -> Result<f64, String> {
    if (MIN_CORRECTION_FACTOR..=MAX_CORRECTION_FACTOR).contains(&factor) {
        Ok(factor)
    } else {
        Err(format!(
            "correction_factor must be between {} and {}, got {}",
            MIN_CORRECTION_FACTOR, MAX_CORRECTION_FACTOR, factor
        ))
    }
}
