// src/models/location.rs
// DOCUMENTATION: Geographic value types
// PURPOSE: Coordinates, attractions and visited locations shared by every service

use chrono::{DateTime, Utc};
use geo_types::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A point on the Earth's surface in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<Point<f64>> for Coordinate {
    fn from(point: Point<f64>) -> Self {
        Self::new(point.y(), point.x())
    }
}

impl From<Coordinate> for Point<f64> {
    fn from(coordinate: Coordinate) -> Self {
        Point::new(coordinate.longitude, coordinate.latitude)
    }
}

/// Represents a point of interest from the attraction catalog
/// DOCUMENTATION: Immutable once loaded; reward dedup uses `name`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attraction {
    /// Unique identifier passed to the reward point source
    pub attraction_id: Uuid,

    /// Display name, unique across the catalog
    pub name: String,

    pub city: String,

    pub state: String,

    pub location: Coordinate,
}

impl Attraction {
    pub fn new(name: &str, city: &str, state: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            attraction_id: Uuid::new_v4(),
            name: name.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            location: Coordinate::new(latitude, longitude),
        }
    }
}

/// One entry in a user's location history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitedLocation {
    pub user_id: Uuid,
    pub location: Coordinate,
    pub time_visited: DateTime<Utc>,
}

impl VisitedLocation {
    pub fn new(user_id: Uuid, location: Coordinate, time_visited: DateTime<Utc>) -> Self {
        Self {
            user_id,
            location,
            time_visited,
        }
    }

    /// A visit recorded right now
    pub fn now(user_id: Uuid, location: Coordinate) -> Self {
        Self::new(user_id, location, Utc::now())
    }
}
