// src/services/tour_guide_service.rs
// DOCUMENTATION: Location tracking orchestrator
// PURPOSE: Fetch locations, run the reward engine, merge results, serve reads

use crate::config::{Config, ProximitySettings};
use crate::errors::Result;
use crate::models::{
    Attraction, Coordinate, NearbyAttraction, TripDeal, User, UserReward, VisitedLocation,
};
use crate::providers::{
    AttractionCatalog, LocationProvider, RewardPointSource, TripPricer, TripQuote,
};
use crate::services::dispatcher::{BoundedDispatcher, DispatchReport};
use crate::services::distance::distance_miles;
use crate::services::rewards_service::{RewardBatch, RewardsService};
use crate::services::user_directory::UserDirectory;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// How the reward engine runs for a tracked location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrackingMode {
    Sequential,
    #[default]
    Parallel,
}

/// Result of tracking one user
#[derive(Debug, Clone, Serialize)]
pub struct TrackOutcome {
    pub user_name: String,
    pub visited_location: VisitedLocation,
    /// Rewards actually inserted into the user
    pub rewards_added: usize,
    /// Qualifying attractions skipped because the point lookup failed
    pub failed_lookups: usize,
}

/// Result of recomputing one user's rewards over their full history
#[derive(Debug, Clone, Serialize)]
pub struct RewardSummary {
    pub user_name: String,
    pub rewards_added: usize,
    pub failed_lookups: usize,
}

/// External collaborators the service is wired with
pub struct Collaborators {
    pub gps: Arc<dyn LocationProvider>,
    pub catalog: Arc<dyn AttractionCatalog>,
    pub point_source: Arc<dyn RewardPointSource>,
    pub pricer: Arc<dyn TripPricer>,
}

/// Tour guide service
/// DOCUMENTATION: Owns the user directory and a cached attraction snapshot.
/// Reward state lives on each `User`; this service is the only code path that
/// merges engine output into it.
pub struct TourGuideService {
    gps: Arc<dyn LocationProvider>,
    catalog: Arc<dyn AttractionCatalog>,
    pricer: Arc<dyn TripPricer>,
    rewards: Arc<RewardsService>,
    users: UserDirectory,
    attractions: RwLock<Arc<Vec<Attraction>>>,
    dispatcher: BoundedDispatcher,
    nearby_attraction_count: usize,
    trip_pricer_api_key: String,
}

impl TourGuideService {
    /// Build the service from validated configuration
    /// DOCUMENTATION: Loads the attraction catalog once; call
    /// `refresh_attractions` to pick up catalog changes
    pub fn new(config: &Config, collaborators: Collaborators) -> Result<Self> {
        config.validate()?;

        let settings = Arc::new(ProximitySettings::new(
            config.proximity_buffer_miles,
            config.attraction_proximity_range_miles,
        )?);
        let rewards = RewardsService::new(collaborators.point_source, settings)
            .with_lookups_in_flight(config.max_in_flight);
        let attractions = collaborators.catalog.attractions();

        log::info!(
            "Tour guide service ready: {} attractions, buffer {} mi, {} slots",
            attractions.len(),
            config.proximity_buffer_miles,
            config.max_in_flight
        );

        Ok(Self {
            gps: collaborators.gps,
            catalog: collaborators.catalog,
            pricer: collaborators.pricer,
            rewards: Arc::new(rewards),
            users: UserDirectory::new(),
            attractions: RwLock::new(Arc::new(attractions)),
            dispatcher: BoundedDispatcher::new(config.max_in_flight)?,
            nearby_attraction_count: config.nearby_attraction_count,
            trip_pricer_api_key: config.trip_pricer_api_key.clone(),
        })
    }

    pub fn rewards_service(&self) -> &Arc<RewardsService> {
        &self.rewards
    }

    pub fn dispatcher(&self) -> BoundedDispatcher {
        self.dispatcher
    }

    /// Current attraction snapshot
    pub async fn attractions(&self) -> Arc<Vec<Attraction>> {
        self.attractions.read().await.clone()
    }

    /// Reload the catalog; in-flight calculations keep their old snapshot
    pub async fn refresh_attractions(&self) -> usize {
        let fresh = Arc::new(self.catalog.attractions());
        let count = fresh.len();
        *self.attractions.write().await = fresh;
        log::info!("Attraction catalog refreshed: {} attractions", count);
        count
    }

    pub async fn add_user(&self, user: Arc<User>) -> bool {
        self.users.add_user(user).await
    }

    pub async fn get_user(&self, user_name: &str) -> Result<Arc<User>> {
        self.users.get_user(user_name).await
    }

    pub async fn get_all_users(&self) -> Vec<Arc<User>> {
        self.users.all_users().await
    }

    pub async fn get_user_rewards(&self, user: &User) -> Vec<UserReward> {
        user.rewards().await
    }

    /// Last known location, tracking the user first if they have no history
    pub async fn get_user_location(&self, user: &User, mode: TrackingMode) -> Result<VisitedLocation> {
        match user.last_visited_location().await {
            Some(location) => Ok(location),
            None => self.track_user_location(user, mode).await,
        }
    }

    /// Track one user and return the fetched location
    pub async fn track_user_location(&self, user: &User, mode: TrackingMode) -> Result<VisitedLocation> {
        Ok(self.track_user(user, mode).await?.visited_location)
    }

    /// Fetch, append, compute, merge
    /// DOCUMENTATION: Only the newly fetched location is evaluated. A failed
    /// location fetch fails the whole call; a failed point lookup only skips
    /// that attraction.
    pub async fn track_user(&self, user: &User, mode: TrackingMode) -> Result<TrackOutcome> {
        let visited = self.gps.current_location(user.user_id).await?;
        user.add_visited_location(visited.clone()).await;

        let attractions = self.attractions().await;
        let locations = std::slice::from_ref(&visited);
        let batch = match mode {
            TrackingMode::Sequential => {
                self.rewards
                    .compute_new_rewards(user, locations, &attractions)
                    .await
            }
            TrackingMode::Parallel => {
                self.rewards
                    .compute_new_rewards_parallel(user, locations, &attractions)
                    .await
            }
        };

        let failed_lookups = batch.failures.len();
        let rewards_added = self.rewards.merge(user, batch.rewards).await;

        log::debug!(
            "Tracked {}: {} new rewards, {} lookups failed",
            user.user_name,
            rewards_added,
            failed_lookups
        );

        Ok(TrackOutcome {
            user_name: user.user_name.clone(),
            visited_location: visited,
            rewards_added,
            failed_lookups,
        })
    }

    /// Track many users with bounded concurrency
    /// DOCUMENTATION: Users whose location fetch fails appear in `failed`;
    /// users not started before `cancel` fired are counted in `skipped`
    pub async fn track_all_users(
        self: &Arc<Self>,
        users: Vec<Arc<User>>,
        mode: TrackingMode,
        cancel: &CancellationToken,
    ) -> DispatchReport<TrackOutcome> {
        let total = users.len();
        let service = Arc::clone(self);

        let report = self
            .dispatcher
            .run_cancellable(
                users,
                move |user: Arc<User>| {
                    let service = service.clone();
                    async move { service.track_user(&user, mode).await }
                },
                cancel,
            )
            .await;

        log::info!(
            "Tracked {}/{} users ({} failed, {} skipped)",
            report.completed.len(),
            total,
            report.failed.len(),
            report.skipped
        );

        report
    }

    /// Recompute rewards over every user's full history
    pub async fn calculate_rewards_for_all(
        self: &Arc<Self>,
        users: Vec<Arc<User>>,
    ) -> DispatchReport<RewardSummary> {
        let attractions = self.attractions().await;
        let rewards = self.rewards.clone();

        self.dispatcher
            .run(users, move |user: Arc<User>| {
                let rewards = rewards.clone();
                let attractions = attractions.clone();
                async move {
                    let before = user.reward_count().await;
                    let RewardBatch { failures, .. } =
                        rewards.calculate_rewards(&user, &attractions).await;
                    Ok(RewardSummary {
                        user_name: user.user_name.clone(),
                        rewards_added: user.reward_count().await - before,
                        failed_lookups: failures.len(),
                    })
                }
            })
            .await
    }

    /// The closest attractions to a location, however far away they are
    pub async fn get_nearby_attractions(&self, visited: &VisitedLocation) -> Vec<Attraction> {
        let attractions = self.attractions().await;
        let mut ranked: Vec<(f64, &Attraction)> = attractions
            .iter()
            .map(|a| (distance_miles(a.location, visited.location), a))
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

        ranked
            .into_iter()
            .take(self.nearby_attraction_count)
            .map(|(_, attraction)| attraction.clone())
            .collect()
    }

    /// Closest attractions with distance and the points a visit would earn
    /// DOCUMENTATION: An attraction whose point lookup fails is left out of
    /// the listing; the rest are still returned
    pub async fn get_nearby_attraction_details(
        &self,
        user: &User,
        mode: TrackingMode,
    ) -> Result<Vec<NearbyAttraction>> {
        let visited = self.get_user_location(user, mode).await?;
        let mut details = Vec::with_capacity(self.nearby_attraction_count);

        for attraction in self.get_nearby_attractions(&visited).await {
            let reward_points = match self
                .rewards
                .get_reward_points(&attraction, user.user_id)
                .await
            {
                Ok(points) => points,
                Err(e) => {
                    log::warn!(
                        "Leaving {} out of nearby attractions for {}: {}",
                        attraction.name,
                        user.user_name,
                        e
                    );
                    continue;
                }
            };
            details.push(NearbyAttraction {
                distance_miles: distance_miles(attraction.location, visited.location),
                attraction_name: attraction.name,
                attraction_location: attraction.location,
                user_location: visited.location,
                reward_points,
            });
        }

        Ok(details)
    }

    pub fn is_within_attraction_proximity(
        &self,
        attraction: &Attraction,
        location: Coordinate,
    ) -> bool {
        self.rewards.is_within_attraction_proximity(attraction, location)
    }

    /// Price trips using the user's cumulative reward points
    pub async fn get_trip_deals(&self, user: &User) -> Result<Vec<TripDeal>> {
        let preferences = user.preferences().await;
        let quote = TripQuote {
            api_key: self.trip_pricer_api_key.clone(),
            user_id: user.user_id,
            adults: preferences.number_of_adults,
            children: preferences.number_of_children,
            nights: preferences.trip_duration,
            reward_points: user.total_reward_points().await,
        };

        let deals = self.pricer.price(&quote)?;
        user.set_trip_deals(deals.clone()).await;
        Ok(deals)
    }
}
