// src/providers/trip_pricer.rs
// DOCUMENTATION: Simulated trip pricing service
// PURPOSE: Turn a reward point total and preferences into priced offers

use super::{TripPricer, TripQuote};
use crate::errors::{Result, TourGuideError};
use crate::models::TripDeal;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Mutex;
use uuid::Uuid;

const PROVIDER_NAMES: [&str; 10] = [
    "Holiday Travels",
    "Enterprize Ventures Limited",
    "Sunny Days",
    "FlyAway Trips",
    "United Partners Vacations",
    "Dream Trips",
    "Live Free",
    "Dancing Waves Cruselines and Partners",
    "AdventureCo",
    "Cure-Your-Blues",
];

/// Number of offers returned per quote
const OFFERS_PER_QUOTE: usize = 5;

/// Simulated pricer
/// DOCUMENTATION: Base price scales with party size and nights; every three
/// reward points knock a dollar off, never below zero
pub struct SimulatedTripPricer {
    rng: Mutex<ChaCha8Rng>,
}

impl SimulatedTripPricer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }
}

impl TripPricer for SimulatedTripPricer {
    fn price(&self, quote: &TripQuote) -> Result<Vec<TripDeal>> {
        if quote.api_key.is_empty() {
            return Err(TourGuideError::PricingUnavailable(
                "missing pricer API key".to_string(),
            ));
        }

        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let discount = quote.reward_points as f64 / 3.0;
        let party = f64::from(quote.adults) + f64::from(quote.children) * 0.5;

        let names: Vec<&str> = PROVIDER_NAMES
            .choose_multiple(&mut *rng, OFFERS_PER_QUOTE)
            .copied()
            .collect();

        let deals = names
            .into_iter()
            .map(|name| {
                let nightly = rng.gen_range(100.0..700.0);
                let price = (nightly * party * f64::from(quote.nights.max(1)) - discount).max(0.0);
                TripDeal {
                    trip_id: Uuid::new_v4(),
                    provider_name: name.to_string(),
                    price: (price * 100.0).round() / 100.0,
                }
            })
            .collect();

        Ok(deals)
    }
}
