// src/services/tracker.rs
// DOCUMENTATION: Background location tracker
// PURPOSE: Periodically track every registered user until stopped

use crate::errors::{Result, TourGuideError};
use crate::services::tour_guide_service::{TourGuideService, TrackingMode};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Handle to the background tracking task
/// DOCUMENTATION: `stop` stops new work from launching, lets in-flight users
/// finish, then waits for the task to exit
pub struct Tracker {
    cancel: CancellationToken,
    rounds: Arc<AtomicU64>,
    handle: JoinHandle<()>,
}

impl Tracker {
    /// Start tracking all users every `interval`
    /// DOCUMENTATION: The first round starts immediately
    pub fn start(service: Arc<TourGuideService>, interval: Duration, mode: TrackingMode) -> Self {
        let cancel = CancellationToken::new();
        let rounds = Arc::new(AtomicU64::new(0));

        let token = cancel.clone();
        let completed_rounds = rounds.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let users = service.get_all_users().await;
                log::debug!("Tracker: begin tracking {} users", users.len());
                let started = Instant::now();

                let report = service.track_all_users(users, mode, &token).await;

                let round = completed_rounds.fetch_add(1, Ordering::SeqCst) + 1;
                log::info!(
                    "Tracker round {}: {} tracked, {} failed, {} skipped in {}s",
                    round,
                    report.completed.len(),
                    report.failed.len(),
                    report.skipped,
                    started.elapsed().as_secs()
                );
            }

            log::debug!("Tracker stopping");
        });

        Self {
            cancel,
            rounds,
            handle,
        }
    }

    /// Rounds finished so far, including a cancelled final round
    pub fn rounds(&self) -> u64 {
        self.rounds.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    pub async fn stop(self) -> Result<()> {
        self.cancel.cancel();
        self.handle
            .await
            .map_err(|e| TourGuideError::TaskFailed(e.to_string()))
    }
}
