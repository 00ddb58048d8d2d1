use crate::constants::EARTH_RADIUS_KM;
use serde::{Deserialize, Serialize};

/// WGS84 position, always latitude first inside the crate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self, String> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(format!(
                "Invalid latitude: {} (must be between -90 and 90)",
                lat
            ));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(format!(
                "Invalid longitude: {} (must be between -180 and 180)",
                lng
            ));
        }
        Ok(Coordinates { lat, lng })
    }

    /// Calculate distance between two coordinates using Haversine formula
    /// Returns distance in kilometers
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }

    /// Round coordinates to specified decimal places for cache keys
    pub fn round(&self, decimal_places: u32) -> Self {
        let multiplier = 10_f64.powi(decimal_places as i32);
        Coordinates {
            lat: (self.lat * multiplier).round() / multiplier,
            lng: (self.lng * multiplier).round() / multiplier,
        }
    }
}

/// Wrap a longitude in degrees into [-180, 180].
pub fn normalize_longitude(lng: f64) -> f64 {
    if (-180.0..=180.0).contains(&lng) {
        return lng;
    }
    (lng + 540.0).rem_euclid(360.0) - 180.0
}

/// Start location as sent by clients: either a `[lat, lng]` pair or a
/// `{ "lat": .., "lng": .. }` object.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(untagged)]
pub enum LocationInput {
    Pair([f64; 2]),
    Object { lat: f64, lng: f64 },
}

impl LocationInput {
    pub fn to_coordinates(self) -> Result<Coordinates, String> {
        match self {
            LocationInput::Pair([lat, lng]) => Coordinates::new(lat, lng),
            LocationInput::Object { lat, lng } => Coordinates::new(lat, lng),
        }
    }
}
