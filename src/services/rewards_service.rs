// src/services/rewards_service.rs
// DOCUMENTATION: Reward engine
// PURPOSE: Decide which attractions earn a reward and fetch their point values

use crate::config::ProximitySettings;
use crate::errors::{Result, TourGuideError};
use crate::models::{Attraction, Coordinate, User, UserReward, VisitedLocation};
use crate::providers::RewardPointSource;
use crate::services::dispatcher::BoundedDispatcher;
use crate::services::distance::{distance_miles, is_within_range};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use uuid::Uuid;

/// Default cap on concurrent point lookups across every call on one service
pub const DEFAULT_LOOKUPS_IN_FLIGHT: usize = 32;

/// Rewards computed by one engine call
/// DOCUMENTATION: `failures` holds one entry per qualifying pair whose point
/// lookup failed; those pairs are skipped, never retried within the call
#[derive(Debug, Default)]
pub struct RewardBatch {
    pub rewards: Vec<UserReward>,
    pub failures: Vec<TourGuideError>,
}

impl RewardBatch {
    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }
}

/// Reward engine
/// DOCUMENTATION: Computes new rewards but never writes them; merging into
/// the user is the caller's job (see `RewardsService::merge`). Both execution
/// modes select the same qualifying pairs:
///
/// 1. Snapshot the user's rewarded attraction names once
/// 2. Walk locations (outer) x attractions (inner) in order
/// 3. A pair qualifies if its attraction name is not yet in the set and the
///    location is within the proximity buffer; the name is then added to a
///    call-local copy of the set
///
/// Only the point lookups differ: one at a time, or through the dispatcher.
///
/// Every lookup holds a slot from one semaphore shared by all calls, so the
/// point source never sees more than `lookups_in_flight` requests at once no
/// matter how many users are being tracked concurrently.
pub struct RewardsService {
    point_source: Arc<dyn RewardPointSource>,
    settings: Arc<ProximitySettings>,
    lookups_in_flight: usize,
    lookup_slots: Arc<Semaphore>,
}

impl RewardsService {
    pub fn new(point_source: Arc<dyn RewardPointSource>, settings: Arc<ProximitySettings>) -> Self {
        Self {
            point_source,
            settings,
            lookups_in_flight: DEFAULT_LOOKUPS_IN_FLIGHT,
            lookup_slots: Arc::new(Semaphore::new(DEFAULT_LOOKUPS_IN_FLIGHT)),
        }
    }

    /// Cap concurrent point lookups across all callers
    pub fn with_lookups_in_flight(mut self, lookups_in_flight: usize) -> Self {
        self.lookups_in_flight = lookups_in_flight.max(1);
        self.lookup_slots = Arc::new(Semaphore::new(self.lookups_in_flight));
        self
    }

    pub fn lookups_in_flight(&self) -> usize {
        self.lookups_in_flight
    }

    pub fn settings(&self) -> &Arc<ProximitySettings> {
        &self.settings
    }

    pub fn set_proximity_buffer(&self, miles: f64) -> Result<()> {
        self.settings.set_proximity_buffer(miles)
    }

    pub fn set_default_proximity_buffer(&self) {
        self.settings.reset_proximity_buffer();
    }

    /// Distance in statute miles
    pub fn get_distance(&self, a: Coordinate, b: Coordinate) -> f64 {
        distance_miles(a, b)
    }

    /// Recommendation-radius test
    pub fn is_within_attraction_proximity(&self, attraction: &Attraction, location: Coordinate) -> bool {
        is_within_range(attraction, location, self.settings.attraction_proximity_range())
    }

    /// Reward-eligibility test against the current proximity buffer
    pub fn near_attraction(&self, visited: &VisitedLocation, attraction: &Attraction) -> bool {
        is_within_range(attraction, visited.location, self.settings.proximity_buffer())
    }

    pub async fn get_reward_points(&self, attraction: &Attraction, user_id: Uuid) -> Result<i32> {
        lookup_points(
            self.point_source.as_ref(),
            &self.lookup_slots,
            attraction.attraction_id,
            user_id,
        )
        .await
    }

    /// Sequential mode
    /// DOCUMENTATION: Lookups run one after another in selection order, so
    /// the returned rewards follow locations-outer, attractions-inner order
    pub async fn compute_new_rewards(
        &self,
        user: &User,
        locations: &[VisitedLocation],
        attractions: &[Attraction],
    ) -> RewardBatch {
        let pairs = self.qualifying_pairs(user, locations, attractions).await;
        let mut batch = RewardBatch::default();

        for (visited, attraction) in pairs {
            match self.get_reward_points(&attraction, user.user_id).await {
                Ok(points) => batch.rewards.push(UserReward::new(visited, attraction, points)),
                Err(e) => {
                    log::warn!(
                        "Skipping reward for {} at {}: {}",
                        user.user_name,
                        attraction.name,
                        e
                    );
                    batch.failures.push(e);
                }
            }
        }

        batch
    }

    /// Parallel mode
    /// DOCUMENTATION: Qualifying pairs are chosen before any lookup starts;
    /// lookups then run through a bounded dispatcher and are all awaited
    /// before returning. Rewards come back in selection order.
    pub async fn compute_new_rewards_parallel(
        &self,
        user: &User,
        locations: &[VisitedLocation],
        attractions: &[Attraction],
    ) -> RewardBatch {
        let pairs = self.qualifying_pairs(user, locations, attractions).await;
        if pairs.is_empty() {
            return RewardBatch::default();
        }

        let dispatcher = match BoundedDispatcher::new(self.lookups_in_flight) {
            Ok(dispatcher) => dispatcher,
            Err(e) => {
                return RewardBatch {
                    rewards: Vec::new(),
                    failures: vec![e],
                }
            }
        };

        let user_id = user.user_id;
        let source = self.point_source.clone();
        let slots = self.lookup_slots.clone();
        let report = dispatcher
            .run(
                pairs.into_iter().enumerate(),
                move |(order, (visited, attraction))| {
                    let source = source.clone();
                    let slots = slots.clone();
                    async move {
                        let points = lookup_points(
                            source.as_ref(),
                            &slots,
                            attraction.attraction_id,
                            user_id,
                        )
                        .await?;
                        Ok((order, UserReward::new(visited, attraction, points)))
                    }
                },
            )
            .await;

        let mut tagged = report.completed;
        tagged.sort_by_key(|(order, _)| *order);

        for e in &report.failed {
            log::warn!("Skipping reward for {}: {}", user.user_name, e);
        }

        RewardBatch {
            rewards: tagged.into_iter().map(|(_, reward)| reward).collect(),
            failures: report.failed,
        }
    }

    /// Insert computed rewards into the user; returns how many were new
    /// DOCUMENTATION: Insert-if-absent per attraction name, so merging the
    /// output of overlapping calls never produces a duplicate
    pub async fn merge(&self, user: &User, rewards: Vec<UserReward>) -> usize {
        let mut added = 0;
        for reward in rewards {
            if user.add_reward(reward).await {
                added += 1;
            }
        }
        added
    }

    /// Bulk recomputation over the user's full history
    /// DOCUMENTATION: Sequential mode over every visited location, merged
    /// into the user. Returns the batch so callers can inspect failures.
    pub async fn calculate_rewards(&self, user: &User, attractions: &[Attraction]) -> RewardBatch {
        let history = user.visited_locations().await;
        let batch = self.compute_new_rewards(user, &history, attractions).await;
        let added = self.merge(user, batch.rewards.clone()).await;

        log::debug!(
            "Calculated rewards for {}: {} new, {} lookups failed",
            user.user_name,
            added,
            batch.failures.len()
        );

        batch
    }

    async fn qualifying_pairs(
        &self,
        user: &User,
        locations: &[VisitedLocation],
        attractions: &[Attraction],
    ) -> Vec<(VisitedLocation, Attraction)> {
        if locations.is_empty() || attractions.is_empty() {
            return Vec::new();
        }

        let rewarded = user.rewarded_attraction_names().await;
        let buffer = self.settings.proximity_buffer();
        select_pairs(rewarded, locations, attractions, buffer)
    }
}

/// One point lookup, holding a shared slot for its duration
async fn lookup_points(
    source: &dyn RewardPointSource,
    slots: &Semaphore,
    attraction_id: Uuid,
    user_id: Uuid,
) -> Result<i32> {
    let _slot = slots
        .acquire()
        .await
        .map_err(|e| TourGuideError::TaskFailed(e.to_string()))?;
    source.reward_points(attraction_id, user_id).await
}

/// Pure selection step shared by both modes
fn select_pairs(
    mut rewarded: HashSet<String>,
    locations: &[VisitedLocation],
    attractions: &[Attraction],
    buffer_miles: f64,
) -> Vec<(VisitedLocation, Attraction)> {
    let mut pairs = Vec::new();

    for visited in locations {
        for attraction in attractions {
            if rewarded.contains(&attraction.name) {
                continue;
            }
            if is_within_range(attraction, visited.location, buffer_miles) {
                rewarded.insert(attraction.name.clone());
                pairs.push((visited.clone(), attraction.clone()));
            }
        }
    }

    pairs
}
