// src/services/distance.rs
// DOCUMENTATION: Great-circle distance and proximity tests
// PURPOSE: Single source of distance for rewards and recommendations

use crate::models::{Attraction, Coordinate};

/// Statute miles in one nautical mile
pub const STATUTE_MILES_PER_NAUTICAL_MILE: f64 = 1.15077945;

/// Nautical miles per degree of arc
const NAUTICAL_MILES_PER_DEGREE: f64 = 60.0;

/// Distance between two coordinates in statute miles
/// DOCUMENTATION: Spherical law of cosines. The cosine term is clamped to
/// [-1, 1] so identical and antipodal points never produce NaN.
pub fn distance_miles(a: Coordinate, b: Coordinate) -> f64 {
    if a == b {
        return 0.0;
    }

    let lat1 = a.latitude.to_radians();
    let lon1 = a.longitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let lon2 = b.longitude.to_radians();

    let cosine = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * (lon1 - lon2).cos();
    let angle = cosine.clamp(-1.0, 1.0).acos();

    let nautical_miles = NAUTICAL_MILES_PER_DEGREE * angle.to_degrees();
    STATUTE_MILES_PER_NAUTICAL_MILE * nautical_miles
}

/// Whether `location` lies within `threshold_miles` of the attraction
pub fn is_within_range(attraction: &Attraction, location: Coordinate, threshold_miles: f64) -> bool {
    distance_miles(attraction.location, location) <= threshold_miles
}
