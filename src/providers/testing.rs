// src/providers/testing.rs
// DOCUMENTATION: Deterministic collaborators for unit tests
// PURPOSE: Fixed locations, fixed points, injectable failures and concurrency gauges

use super::{AttractionCatalog, LocationProvider, ProviderFuture, RewardPointSource};
use crate::errors::TourGuideError;
use crate::models::{Attraction, Coordinate, VisitedLocation};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

/// Tracks how many units are active at once and the highest value seen.
#[derive(Debug, Default)]
pub struct ConcurrencyGauge {
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl ConcurrencyGauge {
    pub fn enter(&self) {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    pub fn exit(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

/// Reports a fixed coordinate per user, except for users told to fail.
/// The gauge counts fetches in progress.
pub struct FixedLocationProvider {
    default: Coordinate,
    per_user: Mutex<HashMap<Uuid, Coordinate>>,
    failing: Mutex<HashSet<Uuid>>,
    delay: Duration,
    calls: AtomicUsize,
    pub gauge: Arc<ConcurrencyGauge>,
}

impl FixedLocationProvider {
    pub fn new(default: Coordinate) -> Self {
        Self {
            default,
            per_user: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            gauge: Arc::new(ConcurrencyGauge::default()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn place_user(&self, user_id: Uuid, coordinate: Coordinate) {
        self.per_user.lock().unwrap().insert(user_id, coordinate);
    }

    pub fn fail_for(&self, user_id: Uuid) {
        self.failing.lock().unwrap().insert(user_id);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LocationProvider for FixedLocationProvider {
    fn current_location(&self, user_id: Uuid) -> ProviderFuture<'_, VisitedLocation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let failing = self.failing.lock().unwrap().contains(&user_id);
        let coordinate = self
            .per_user
            .lock()
            .unwrap()
            .get(&user_id)
            .copied()
            .unwrap_or(self.default);
        let gauge = self.gauge.clone();
        let delay = self.delay;

        Box::pin(async move {
            gauge.enter();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            gauge.exit();

            if failing {
                return Err(TourGuideError::LocationUnavailable(user_id));
            }
            Ok(VisitedLocation::now(user_id, coordinate))
        })
    }
}

pub struct StaticCatalog(pub Vec<Attraction>);

impl AttractionCatalog for StaticCatalog {
    fn attractions(&self) -> Vec<Attraction> {
        self.0.clone()
    }
}

/// Returns a fixed value per attraction, with optional delay and failures.
pub struct FixedPointSource {
    points: i32,
    overrides: Mutex<HashMap<Uuid, i32>>,
    failing: Mutex<HashSet<Uuid>>,
    delay: Duration,
    calls: AtomicUsize,
    pub gauge: Arc<ConcurrencyGauge>,
}

impl FixedPointSource {
    pub fn new(points: i32) -> Self {
        Self {
            points,
            overrides: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            gauge: Arc::new(ConcurrencyGauge::default()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn set_points(&self, attraction_id: Uuid, points: i32) {
        self.overrides.lock().unwrap().insert(attraction_id, points);
    }

    pub fn fail_for(&self, attraction_id: Uuid) {
        self.failing.lock().unwrap().insert(attraction_id);
    }

    pub fn recover(&self, attraction_id: Uuid) {
        self.failing.lock().unwrap().remove(&attraction_id);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RewardPointSource for FixedPointSource {
    fn reward_points(&self, attraction_id: Uuid, user_id: Uuid) -> ProviderFuture<'_, i32> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let failing = self.failing.lock().unwrap().contains(&attraction_id);
        let points = self
            .overrides
            .lock()
            .unwrap()
            .get(&attraction_id)
            .copied()
            .unwrap_or(self.points);
        let gauge = self.gauge.clone();
        let delay = self.delay;

        Box::pin(async move {
            gauge.enter();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            } else {
                tokio::task::yield_now().await;
            }
            gauge.exit();

            if failing {
                return Err(TourGuideError::RewardPointsUnavailable {
                    attraction_id,
                    user_id,
                });
            }
            Ok(points)
        })
    }
}
