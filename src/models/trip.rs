// src/models/trip.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A priced trip offer returned by the trip pricer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripDeal {
    pub trip_id: Uuid,
    pub provider_name: String,
    pub price: f64,
}

/// Closest-attraction entry shown to a traveler
/// DOCUMENTATION: Attraction and user coordinates, distance in miles and
/// the points the traveler would earn by visiting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyAttraction {
    pub attraction_name: String,
    pub attraction_location: super::Coordinate,
    pub user_location: super::Coordinate,
    pub distance_miles: f64,
    pub reward_points: i32,
}
