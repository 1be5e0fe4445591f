// src/models/user.rs
// DOCUMENTATION: Traveler record and its mutable per-user state
// PURPOSE: Location history, reward ledger and trip preferences behind async locks

use super::{RewardLedger, TripDeal, UserReward, VisitedLocation};
use crate::errors::{Result, TourGuideError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tokio::sync::RwLock;
use uuid::Uuid;
use validator::Validate;

/// Trip preferences handed to the pricer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct UserPreferences {
    /// Nights away
    #[validate(range(min = 1, max = 60))]
    pub trip_duration: u32,

    #[validate(range(min = 1, max = 20))]
    pub ticket_quantity: u32,

    #[validate(range(min = 1, max = 20))]
    pub number_of_adults: u32,

    #[validate(range(max = 20))]
    pub number_of_children: u32,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            trip_duration: 1,
            ticket_quantity: 1,
            number_of_adults: 1,
            number_of_children: 0,
        }
    }
}

/// A traveler and everything recorded about them
/// DOCUMENTATION: Identity fields are immutable. History is append-only and
/// rewards are insert-if-absent, each behind its own lock so reporting reads
/// never block tracking of unrelated state.
#[derive(Debug)]
pub struct User {
    pub user_id: Uuid,
    pub user_name: String,
    pub phone_number: String,
    pub email_address: String,
    preferences: RwLock<UserPreferences>,
    visited_locations: RwLock<Vec<VisitedLocation>>,
    rewards: RwLock<RewardLedger>,
    trip_deals: RwLock<Vec<TripDeal>>,
}

impl User {
    pub fn new(user_id: Uuid, user_name: &str, phone_number: &str, email_address: &str) -> Self {
        Self {
            user_id,
            user_name: user_name.to_string(),
            phone_number: phone_number.to_string(),
            email_address: email_address.to_string(),
            preferences: RwLock::new(UserPreferences::default()),
            visited_locations: RwLock::new(Vec::new()),
            rewards: RwLock::new(RewardLedger::default()),
            trip_deals: RwLock::new(Vec::new()),
        }
    }

    pub async fn add_visited_location(&self, location: VisitedLocation) {
        self.visited_locations.write().await.push(location);
    }

    /// Snapshot of the full history in visit order
    pub async fn visited_locations(&self) -> Vec<VisitedLocation> {
        self.visited_locations.read().await.clone()
    }

    /// Most recently appended visit, if any
    pub async fn last_visited_location(&self) -> Option<VisitedLocation> {
        self.visited_locations.read().await.last().cloned()
    }

    pub async fn has_visited(&self) -> bool {
        !self.visited_locations.read().await.is_empty()
    }

    /// Record a reward unless this attraction was already rewarded
    /// DOCUMENTATION: The membership check and the insert happen under one
    /// write lock, so concurrent mergers cannot both succeed for the same name
    pub async fn add_reward(&self, reward: UserReward) -> bool {
        let added = self.rewards.write().await.insert(reward);
        if !added {
            log::debug!("User {} already rewarded for that attraction", self.user_name);
        }
        added
    }

    pub async fn rewards(&self) -> Vec<UserReward> {
        self.rewards.read().await.entries().to_vec()
    }

    /// Names of attractions already rewarded, as an owned snapshot
    pub async fn rewarded_attraction_names(&self) -> HashSet<String> {
        self.rewards.read().await.rewarded_names()
    }

    pub async fn reward_count(&self) -> usize {
        self.rewards.read().await.len()
    }

    /// Cumulative points consumed by the trip pricer
    pub async fn total_reward_points(&self) -> i64 {
        self.rewards.read().await.total_points()
    }

    pub async fn preferences(&self) -> UserPreferences {
        self.preferences.read().await.clone()
    }

    pub async fn update_preferences(&self, preferences: UserPreferences) -> Result<()> {
        preferences
            .validate()
            .map_err(|e| TourGuideError::InvalidInput(e.to_string()))?;
        *self.preferences.write().await = preferences;
        Ok(())
    }

    pub async fn trip_deals(&self) -> Vec<TripDeal> {
        self.trip_deals.read().await.clone()
    }

    pub async fn set_trip_deals(&self, deals: Vec<TripDeal>) {
        *self.trip_deals.write().await = deals;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Attraction, Coordinate};
    use std::sync::Arc;

    fn sample_user() -> User {
        User::new(Uuid::new_v4(), "jon", "000", "jon@tourGuide.com")
    }

    #[tokio::test]
    async fn test_history_is_append_only_and_ordered() {
        let user = sample_user();
        assert!(!user.has_visited().await);
        assert!(user.last_visited_location().await.is_none());

        let first = VisitedLocation::now(user.user_id, Coordinate::new(1.0, 1.0));
        let second = VisitedLocation::now(user.user_id, Coordinate::new(2.0, 2.0));
        user.add_visited_location(first.clone()).await;
        user.add_visited_location(second.clone()).await;

        assert_eq!(user.visited_locations().await, vec![first, second.clone()]);
        assert_eq!(user.last_visited_location().await, Some(second));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_reward_merge_keeps_one_per_attraction() {
        let user = Arc::new(sample_user());
        let attraction = Attraction::new("Disneyland", "Anaheim", "CA", 33.817595, -117.922008);

        let mut handles = Vec::new();
        for points in 0..32 {
            let user = user.clone();
            let attraction = attraction.clone();
            handles.push(tokio::spawn(async move {
                let location = VisitedLocation::now(user.user_id, attraction.location);
                user.add_reward(UserReward::new(location, attraction, points)).await
            }));
        }

        let mut added = 0;
        for handle in handles {
            if handle.await.unwrap() {
                added += 1;
            }
        }

        assert_eq!(added, 1);
        assert_eq!(user.reward_count().await, 1);
    }

    #[tokio::test]
    async fn test_invalid_preferences_rejected() {
        let user = sample_user();
        let bad = UserPreferences {
            number_of_adults: 0,
            ..UserPreferences::default()
        };

        assert!(matches!(
            user.update_preferences(bad).await,
            Err(TourGuideError::InvalidInput(_))
        ));
        assert_eq!(user.preferences().await, UserPreferences::default());
    }
}
