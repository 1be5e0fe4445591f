// src/providers/gps.rs
// DOCUMENTATION: Simulated GPS service
// PURPOSE: Fixed attraction catalog and random current locations

use super::{AttractionCatalog, LocationProvider, ProviderFuture};
use crate::models::{Attraction, Coordinate, VisitedLocation};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

/// Web-mercator latitude limit used for random positions
const MAX_LATITUDE: f64 = 85.05112878;

/// Simulated GPS backend
/// DOCUMENTATION: Serves a fixed catalog of US attractions and answers
/// location queries with a random coordinate after an optional delay
pub struct SimulatedGps {
    attractions: Arc<Vec<Attraction>>,
    rng: Mutex<ChaCha8Rng>,
    latency: Option<Duration>,
}

impl SimulatedGps {
    pub fn new(seed: u64) -> Self {
        Self {
            attractions: Arc::new(default_attractions()),
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
            latency: None,
        }
    }

    /// Delay every location query, like a remote GPS service would
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn random_coordinate(&self) -> Coordinate {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Coordinate::new(
            rng.gen_range(-MAX_LATITUDE..=MAX_LATITUDE),
            rng.gen_range(-180.0..=180.0),
        )
    }
}

impl LocationProvider for SimulatedGps {
    fn current_location(&self, user_id: Uuid) -> ProviderFuture<'_, VisitedLocation> {
        Box::pin(async move {
            if let Some(latency) = self.latency {
                tokio::time::sleep(latency).await;
            }
            let location = self.random_coordinate();
            log::debug!(
                "GPS fix for {}: ({:.6}, {:.6})",
                user_id,
                location.latitude,
                location.longitude
            );
            Ok(VisitedLocation::now(user_id, location))
        })
    }
}

impl AttractionCatalog for SimulatedGps {
    fn attractions(&self) -> Vec<Attraction> {
        self.attractions.as_ref().clone()
    }
}

/// The catalog served by the simulated GPS
pub fn default_attractions() -> Vec<Attraction> {
    vec![
        Attraction::new("Disneyland", "Anaheim", "CA", 33.817595, -117.922008),
        Attraction::new("Jackson Hole", "Jackson Hole", "WY", 43.582767, -110.821999),
        Attraction::new("Mojave National Preserve", "Kelso", "CA", 35.141689, -115.510399),
        Attraction::new("Joshua Tree National Park", "Joshua Tree National Park", "CA", 33.881866, -115.90065),
        Attraction::new("Buffalo National River", "St Joe", "AR", 35.985512, -92.757652),
        Attraction::new("Hot Springs National Park", "Hot Springs", "AR", 34.52153, -93.042267),
        Attraction::new("Kartchner Caverns State Park", "Benson", "AZ", 31.837551, -110.347382),
        Attraction::new("Legend Valley", "Thornville", "OH", 39.937778, -82.40667),
        Attraction::new("Flowers Bakery of London", "Flowers Bakery of London", "KY", 37.131527, -84.07486),
        Attraction::new("McKinley Tower", "Anchorage", "AK", 61.218887, -149.877502),
        Attraction::new("Flatiron Building", "New York City", "NY", 40.741112, -73.989723),
        Attraction::new("Fallingwater", "Mill Run", "PA", 39.906113, -79.468056),
        Attraction::new("Union Station", "Washington D.C.", "CA", 38.897095, -77.006332),
        Attraction::new("Roger Dean Stadium", "Jupiter", "FL", 26.890959, -80.116577),
        Attraction::new("Texas Memorial Stadium", "Austin", "TX", 30.283682, -97.732536),
        Attraction::new("Bryant-Denny Stadium", "Tuscaloosa", "AL", 33.208973, -87.550438),
        Attraction::new("Tiger Stadium", "Baton Rouge", "LA", 30.412035, -91.183815),
        Attraction::new("Neyland Stadium", "Knoxville", "TN", 35.955013, -83.925011),
        Attraction::new("Kyle Field", "College Station", "TX", 30.61025, -96.339844),
        Attraction::new("San Diego Zoo", "San Diego", "CA", 32.735317, -117.149048),
        Attraction::new("Zoo Tampa at Lowry Park", "Tampa", "FL", 28.012804, -82.469269),
        Attraction::new("Franklin Park Zoo", "Boston", "MA", 42.302601, -71.086731),
        Attraction::new("El Paso Zoo", "El Paso", "TX", 31.769125, -106.44487),
        Attraction::new("Kansas City Zoo", "Kansas City", "MO", 39.007504, -94.529625),
        Attraction::new("Bronx Zoo", "Bronx", "NY", 40.852905, -73.872971),
        Attraction::new("Cinderella Castle", "Orlando", "FL", 28.419411, -81.5812),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_names_are_unique() {
        let attractions = default_attractions();
        let names: HashSet<&str> = attractions.iter().map(|a| a.name.as_str()).collect();

        assert_eq!(attractions.len(), 26);
        assert_eq!(names.len(), attractions.len());
    }

    #[tokio::test]
    async fn test_locations_are_in_range() {
        let gps = SimulatedGps::new(7);
        let user_id = Uuid::new_v4();

        for _ in 0..200 {
            let visit = gps.current_location(user_id).await.unwrap();
            assert_eq!(visit.user_id, user_id);
            assert!(visit.location.latitude.abs() <= MAX_LATITUDE);
            assert!(visit.location.longitude.abs() <= 180.0);
        }
    }

    #[tokio::test]
    async fn test_same_seed_same_locations() {
        let user_id = Uuid::new_v4();
        let a = SimulatedGps::new(99);
        let b = SimulatedGps::new(99);

        for _ in 0..10 {
            let first = a.current_location(user_id).await.unwrap();
            let second = b.current_location(user_id).await.unwrap();
            assert_eq!(first.location, second.location);
        }
    }
}
