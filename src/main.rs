// src/main.rs
// DOCUMENTATION: Simulation entry point
// PURPOSE: Initialize config and logging, then track simulated users

use anyhow::Context;
use dotenv::dotenv;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tourguide_rewards::config::Config;
use tourguide_rewards::providers::{SimulatedGps, SimulatedRewardCentral, SimulatedTripPricer};
use tourguide_rewards::services::{
    Collaborators, InternalUserGenerator, TourGuideService, Tracker, TrackingMode,
};

/// Upper bound on simulated reward central latency
const REWARD_CENTRAL_MAX_LATENCY: Duration = Duration::from_millis(1000);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            config.log_level.as_str()
        } else {
            "info"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    config.validate().context("invalid configuration")?;

    log::info!("Starting tourguide-rewards simulation...");
    log::info!("Environment: {}", config.environment);

    // 4. Wire simulated collaborators
    let seed = config.rng_seed.unwrap_or_else(rand::random);
    log::info!("Simulation seed: {}", seed);

    let gps = Arc::new(SimulatedGps::new(seed));
    let service = TourGuideService::new(
        &config,
        Collaborators {
            gps: gps.clone(),
            catalog: gps,
            point_source: Arc::new(SimulatedRewardCentral::new(
                seed.wrapping_add(1),
                REWARD_CENTRAL_MAX_LATENCY,
            )),
            pricer: Arc::new(SimulatedTripPricer::new(seed.wrapping_add(2))),
        },
    )
    .context("failed to build tour guide service")?;
    let service = Arc::new(service);

    // 5. Create internal test users
    log::debug!("Initializing users");
    let users = InternalUserGenerator::new(seed)
        .generate(config.internal_user_count)
        .await;
    for user in users {
        service.add_user(Arc::new(user)).await;
    }
    log::debug!("Finished initializing users");

    // 6. One bounded tracking round, cancellable with Ctrl-C
    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupt received, finishing in-flight users");
            ctrl_c.cancel();
        }
    });

    let started = Instant::now();
    let report = service
        .track_all_users(service.get_all_users().await, TrackingMode::Parallel, &cancel)
        .await;
    log::info!(
        "Tracking round finished in {:.2}s",
        started.elapsed().as_secs_f64()
    );

    let total_rewards: usize = report.completed.iter().map(|o| o.rewards_added).sum();
    let summary = serde_json::json!({
        "users_tracked": report.completed.len(),
        "users_failed": report.failed.len(),
        "users_skipped": report.skipped,
        "rewards_added": total_rewards,
        "failures": report.failed.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
    });
    log::info!("Summary: {}", serde_json::to_string_pretty(&summary)?);

    if cancel.is_cancelled() {
        return Ok(());
    }

    // 7. Keep tracking in the background until Ctrl-C
    let tracker = Tracker::start(
        service.clone(),
        Duration::from_secs(config.tracking_interval_secs),
        TrackingMode::Parallel,
    );
    log::info!(
        "Tracker started (interval: {}s), press Ctrl-C to stop",
        config.tracking_interval_secs
    );

    cancel.cancelled().await;
    tracker.stop().await.context("tracker did not shut down cleanly")?;
    log::info!("Tracker stopped");

    Ok(())
}
