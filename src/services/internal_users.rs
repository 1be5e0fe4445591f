// src/services/internal_users.rs
// DOCUMENTATION: Seeded generator for simulated travelers
// PURPOSE: Reproducible users with a short random location history

use crate::models::{Coordinate, User, VisitedLocation};
use chrono::{DateTime, Duration, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

/// Visits generated per user
pub const HISTORY_LENGTH: usize = 3;

/// Generated visits fall within this many days before `now`
const HISTORY_WINDOW_DAYS: i64 = 30;

/// Internal test user generator
/// DOCUMENTATION: Same seed and same `now` give the same users, ids included
pub struct InternalUserGenerator {
    rng: ChaCha8Rng,
    now: DateTime<Utc>,
}

impl InternalUserGenerator {
    pub fn new(seed: u64) -> Self {
        Self::with_clock(seed, Utc::now())
    }

    /// Pin the reference time, for reproducible timestamps
    pub fn with_clock(seed: u64, now: DateTime<Utc>) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            now,
        }
    }

    /// Generate `count` users named internalUser0..internalUser{count-1}
    /// DOCUMENTATION: Each user starts with HISTORY_LENGTH visited locations
    /// and no rewards
    pub async fn generate(&mut self, count: usize) -> Vec<User> {
        let mut users = Vec::with_capacity(count);

        for i in 0..count {
            let user_name = format!("internalUser{}", i);
            let user = User::new(
                self.random_uuid(),
                &user_name,
                "000",
                &format!("{}@tourGuide.com", user_name),
            );

            for _ in 0..HISTORY_LENGTH {
                let visit = VisitedLocation::new(
                    user.user_id,
                    self.random_coordinate(),
                    self.random_time(),
                );
                user.add_visited_location(visit).await;
            }

            users.push(user);
        }

        log::debug!("Created {} internal test users", count);
        users
    }

    fn random_uuid(&mut self) -> Uuid {
        uuid::Builder::from_random_bytes(self.rng.gen()).into_uuid()
    }

    fn random_coordinate(&mut self) -> Coordinate {
        Coordinate::new(
            self.rng.gen_range(-90.0..90.0),
            self.rng.gen_range(-180.0..180.0),
        )
    }

    fn random_time(&mut self) -> DateTime<Utc> {
        self.now - Duration::days(self.rng.gen_range(0..HISTORY_WINDOW_DAYS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generates_named_users_with_history() {
        let users = InternalUserGenerator::new(42).generate(5).await;

        assert_eq!(users.len(), 5);
        for (i, user) in users.iter().enumerate() {
            assert_eq!(user.user_name, format!("internalUser{}", i));
            assert_eq!(user.email_address, format!("internalUser{}@tourGuide.com", i));
            assert_eq!(user.visited_locations().await.len(), HISTORY_LENGTH);
            assert_eq!(user.reward_count().await, 0);
        }
    }

    #[tokio::test]
    async fn test_same_seed_is_reproducible() {
        let now = Utc::now();
        let a = InternalUserGenerator::with_clock(7, now).generate(3).await;
        let b = InternalUserGenerator::with_clock(7, now).generate(3).await;
        let c = InternalUserGenerator::with_clock(8, now).generate(3).await;

        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.user_id, y.user_id);
            assert_eq!(x.visited_locations().await, y.visited_locations().await);
        }
        assert_ne!(a[0].user_id, c[0].user_id);
    }

    #[tokio::test]
    async fn test_history_within_bounds() {
        let now = Utc::now();
        let users = InternalUserGenerator::with_clock(1, now).generate(20).await;

        for user in &users {
            for visit in user.visited_locations().await {
                assert!(visit.location.latitude.abs() <= 90.0);
                assert!(visit.location.longitude.abs() <= 180.0);
                assert!(visit.time_visited <= now);
                assert!(visit.time_visited > now - Duration::days(HISTORY_WINDOW_DAYS));
            }
        }
    }
}
