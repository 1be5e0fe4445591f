// src/providers/reward_central.rs
// DOCUMENTATION: Simulated reward point service
// PURPOSE: Random point values behind a simulated network delay

use super::{ProviderFuture, RewardPointSource};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

/// Simulated reward central
/// DOCUMENTATION: Each lookup sleeps a random duration up to `max_latency`
/// then returns 1..=1000 points
pub struct SimulatedRewardCentral {
    rng: Mutex<ChaCha8Rng>,
    max_latency: Duration,
}

impl SimulatedRewardCentral {
    pub fn new(seed: u64, max_latency: Duration) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
            max_latency,
        }
    }

    fn draw(&self) -> (Duration, i32) {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let max_ms = self.max_latency.as_millis() as u64;
        let delay = if max_ms == 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(rng.gen_range(0..=max_ms))
        };
        (delay, rng.gen_range(1..=1000))
    }
}

impl RewardPointSource for SimulatedRewardCentral {
    fn reward_points(&self, attraction_id: Uuid, user_id: Uuid) -> ProviderFuture<'_, i32> {
        Box::pin(async move {
            let (delay, points) = self.draw();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            log::debug!(
                "Reward central: {} points for attraction {} / user {}",
                points,
                attraction_id,
                user_id
            );
            Ok(points)
        })
    }
}
