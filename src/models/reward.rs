// src/models/reward.rs
// DOCUMENTATION: Reward records granted to users
// PURPOSE: Defines UserReward and the per-user reward ledger

use super::{Attraction, VisitedLocation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A (location, attraction, points) record granted at most once per attraction
/// DOCUMENTATION: Only the reward engine materializes these
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserReward {
    pub visited_location: VisitedLocation,
    pub attraction: Attraction,
    pub reward_points: i32,
}

impl UserReward {
    pub(crate) fn new(
        visited_location: VisitedLocation,
        attraction: Attraction,
        reward_points: i32,
    ) -> Self {
        Self {
            visited_location,
            attraction,
            reward_points,
        }
    }

    pub fn attraction_name(&self) -> &str {
        &self.attraction.name
    }
}

/// Append-only reward store keyed by attraction name
/// DOCUMENTATION: Keeps award order for reporting while rejecting a second
/// reward for an attraction that already has one
#[derive(Debug, Default, Clone)]
pub struct RewardLedger {
    rewarded: HashSet<String>,
    entries: Vec<UserReward>,
}

impl RewardLedger {
    /// Insert unless the attraction already has a reward; returns whether it was added
    pub fn insert(&mut self, reward: UserReward) -> bool {
        if !self.rewarded.insert(reward.attraction.name.clone()) {
            return false;
        }
        self.entries.push(reward);
        true
    }

    pub fn contains(&self, attraction_name: &str) -> bool {
        self.rewarded.contains(attraction_name)
    }

    pub fn rewarded_names(&self) -> HashSet<String> {
        self.rewarded.clone()
    }

    pub fn entries(&self) -> &[UserReward] {
        &self.entries
    }

    pub fn total_points(&self) -> i64 {
        self.entries.iter().map(|r| i64::from(r.reward_points)).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
