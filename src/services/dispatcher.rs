// src/services/dispatcher.rs
// DOCUMENTATION: Bounded concurrent fan-out
// PURPOSE: Run many units of work with a hard cap on how many are in flight

use crate::errors::{Result, TourGuideError};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;

/// Outcome of a dispatched batch
/// DOCUMENTATION: Successful results arrive in completion order, not input
/// order. Failed units are listed with their error; units never launched
/// because of cancellation are counted in `skipped`.
#[derive(Debug, Serialize)]
pub struct DispatchReport<R> {
    pub completed: Vec<R>,
    #[serde(serialize_with = "serialize_errors")]
    pub failed: Vec<TourGuideError>,
    pub skipped: usize,
}

impl<R> Default for DispatchReport<R> {
    fn default() -> Self {
        Self {
            completed: Vec::new(),
            failed: Vec::new(),
            skipped: 0,
        }
    }
}

impl<R> DispatchReport<R> {
    fn record(&mut self, joined: std::result::Result<Result<R>, JoinError>) {
        match joined {
            Ok(Ok(value)) => self.completed.push(value),
            Ok(Err(e)) => {
                log::debug!("Dispatched unit failed: {}", e);
                self.failed.push(e);
            }
            Err(e) => {
                log::warn!("Dispatched unit aborted: {}", e);
                self.failed.push(TourGuideError::TaskFailed(e.to_string()));
            }
        }
    }

    /// Units that ran to completion, successfully or not
    pub fn processed(&self) -> usize {
        self.completed.len() + self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.skipped == 0
    }
}

fn serialize_errors<S>(errors: &[TourGuideError], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_seq(errors.iter().map(|e| e.to_string()))
}

/// Fans work out over tokio tasks with at most `max_in_flight` running
/// DOCUMENTATION: A slot is a semaphore permit owned by the spawned task, so
/// it is released when the task finishes, fails or panics. Waiting for a
/// slot suspends the caller; it never spins.
#[derive(Debug, Clone, Copy)]
pub struct BoundedDispatcher {
    max_in_flight: usize,
}

impl BoundedDispatcher {
    pub fn new(max_in_flight: usize) -> Result<Self> {
        if max_in_flight == 0 {
            return Err(TourGuideError::InvalidInput(
                "max_in_flight must be at least 1".to_string(),
            ));
        }
        Ok(Self { max_in_flight })
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    /// Process every item exactly once
    pub async fn run<T, R, F, Fut>(
        &self,
        items: impl IntoIterator<Item = T>,
        work: F,
    ) -> DispatchReport<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R>> + Send + 'static,
    {
        self.run_cancellable(items, work, &CancellationToken::new())
            .await
    }

    /// Process items until `cancel` fires
    /// DOCUMENTATION: Cancellation stops launching new units. Units already
    /// running finish and release their slots; the rest count as skipped.
    pub async fn run_cancellable<T, R, F, Fut>(
        &self,
        items: impl IntoIterator<Item = T>,
        work: F,
        cancel: &CancellationToken,
    ) -> DispatchReport<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R>> + Send + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.max_in_flight));
        let work = Arc::new(work);
        let mut tasks = JoinSet::new();
        let mut report = DispatchReport::default();
        let mut items = items.into_iter();
        let mut launched = 0usize;

        while let Some(item) = items.next() {
            let permit = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                permit = semaphore.clone().acquire_owned() => permit.ok(),
            };

            let Some(permit) = permit else {
                report.skipped = 1 + items.by_ref().count();
                log::info!(
                    "Dispatch cancelled after launching {} units ({} skipped)",
                    launched,
                    report.skipped
                );
                break;
            };

            let work = work.clone();
            tasks.spawn(async move {
                let _slot = permit;
                work(item).await
            });
            launched += 1;

            // Drain finished units so a large batch does not pile up results
            while let Some(joined) = tasks.try_join_next() {
                report.record(joined);
            }
        }

        while let Some(joined) = tasks.join_next().await {
            report.record(joined);
        }

        if !report.failed.is_empty() {
            log::warn!(
                "Dispatch finished: {} completed, {} failed, {} skipped",
                report.completed.len(),
                report.failed.len(),
                report.skipped
            );
        } else {
            log::debug!(
                "Dispatch finished: {} completed, {} skipped",
                report.completed.len(),
                report.skipped
            );
        }

        report
    }
}

/// Convenience wrapper: build a dispatcher and run one batch
pub async fn run_bounded<T, R, F, Fut>(
    items: impl IntoIterator<Item = T>,
    max_in_flight: usize,
    work: F,
) -> Result<DispatchReport<R>>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R>> + Send + 'static,
{
    let dispatcher = BoundedDispatcher::new(max_in_flight)?;
    Ok(dispatcher.run(items, work).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::testing::ConcurrencyGauge;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_zero_in_flight_rejected() {
        assert!(BoundedDispatcher::new(0).is_err());
        assert!(run_bounded(vec![1], 0, |x: i32| async move { Ok(x) })
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_every_item_processed_once() {
        let report = run_bounded(0..500u32, 16, |x| async move { Ok(x * 2) })
            .await
            .unwrap();

        let mut values = report.completed.clone();
        values.sort_unstable();
        assert_eq!(values, (0..500u32).map(|x| x * 2).collect::<Vec<_>>());
        assert!(report.is_clean());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_in_flight_never_exceeds_limit() {
        for (limit, count) in [(1usize, 40usize), (3, 100), (25, 400)] {
            let gauge = Arc::new(ConcurrencyGauge::default());
            let tracked = gauge.clone();

            let report = run_bounded(0..count, limit, move |i| {
                let gauge = tracked.clone();
                async move {
                    gauge.enter();
                    tokio::time::sleep(Duration::from_millis(1)).await;
                    gauge.exit();
                    Ok(i)
                }
            })
            .await
            .unwrap();

            assert_eq!(report.completed.len(), count);
            assert!(gauge.peak() <= limit, "peak {} > {}", gauge.peak(), limit);
            assert_eq!(gauge.active(), 0);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_failure_is_isolated() {
        let report = run_bounded(0..50u32, 8, |i| async move {
            if i == 17 {
                Err::<u32, _>(TourGuideError::RewardPointsUnavailable {
                    attraction_id: uuid::Uuid::nil(),
                    user_id: uuid::Uuid::nil(),
                })
            } else {
                Ok(i)
            }
        })
        .await
        .unwrap();

        assert_eq!(report.completed.len(), 49);
        assert!(!report.completed.contains(&17));
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].is_transient());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_failing_units_release_slots() {
        // Every unit fails; a leaked slot would hang the second half
        let report = run_bounded(0..200u32, 2, |i| async move {
            if i % 2 == 0 {
                Err::<u32, _>(TourGuideError::TaskFailed(format!("unit {}", i)))
            } else {
                panic!("unit {} blew up", i)
            }
        })
        .await
        .unwrap();

        assert!(report.completed.is_empty());
        assert_eq!(report.failed.len(), 200);
    }

    #[tokio::test]
    async fn test_cancellation_stops_new_work() {
        let started = Arc::new(AtomicUsize::new(0));
        let cancel = CancellationToken::new();
        let dispatcher = BoundedDispatcher::new(2).unwrap();

        let counter = started.clone();
        let trigger = cancel.clone();
        let report = dispatcher
            .run_cancellable(
                0..100u32,
                move |i| {
                    let counter = counter.clone();
                    let trigger = trigger.clone();
                    async move {
                        if counter.fetch_add(1, Ordering::SeqCst) + 1 == 10 {
                            trigger.cancel();
                        }
                        tokio::time::sleep(Duration::from_millis(2)).await;
                        Ok(i)
                    }
                },
                &cancel,
            )
            .await;

        let launched = started.load(Ordering::SeqCst);
        assert!(launched < 100);
        assert_eq!(report.completed.len(), launched);
        assert_eq!(report.skipped, 100 - launched);
        assert!(report.failed.is_empty());
    }

    #[tokio::test]
    async fn test_already_cancelled_launches_nothing() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let report = BoundedDispatcher::new(4)
            .unwrap()
            .run_cancellable(0..10u32, |i| async move { Ok(i) }, &cancel)
            .await;

        assert!(report.completed.is_empty());
        assert_eq!(report.skipped, 10);
    }

    #[tokio::test]
    async fn test_report_serializes_errors_as_strings() {
        let report = run_bounded(vec![1u32], 1, |_| async move {
            Err::<u32, _>(TourGuideError::Cancelled)
        })
        .await
        .unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["failed"][0], "Operation cancelled");
        assert_eq!(json["skipped"], 0);
    }
}
