//! Admission control for probe invocations.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::Semaphore;
use viddur_av::DurationProber;

use super::ProbeOutcome;

/// Runs probes with at most `limit` in flight at once.
///
/// Waiting for a slot suspends only the calling task. Tokio's semaphore
/// queues waiters in FIFO order, so every waiter is eventually served.
#[derive(Clone)]
pub struct Dispatcher {
    semaphore: Arc<Semaphore>,
    prober: Arc<dyn DurationProber>,
}

impl Dispatcher {
    pub fn new(prober: Arc<dyn DurationProber>, limit: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(limit)),
            prober,
        }
    }

    /// Probe `path` once a slot is free.
    ///
    /// The slot is released when the permit drops, whatever the outcome.
    pub async fn dispatch(&self, path: &Path) -> ProbeOutcome {
        let Ok(_permit) = self.semaphore.acquire().await else {
            tracing::warn!("Probe semaphore closed, skipping {:?}", path);
            return ProbeOutcome::ProbeFailed;
        };

        match self.prober.duration(path).await {
            Ok(seconds) => ProbeOutcome::Duration(seconds),
            Err(e) => {
                tracing::debug!(
                    prober = self.prober.name(),
                    file = %path.display(),
                    error = %e,
                    "Probe failed"
                );
                ProbeOutcome::ProbeFailed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Tracks how many probes overlap.
    #[derive(Default)]
    struct CountingProber {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DurationProber for CountingProber {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn duration(&self, _path: &Path) -> viddur_av::Result<f64> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(1.0)
        }
    }

    struct FailingProber;

    #[async_trait]
    impl DurationProber for FailingProber {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn duration(&self, path: &Path) -> viddur_av::Result<f64> {
            Err(viddur_av::Error::ZeroDuration {
                path: path.to_path_buf(),
            })
        }
    }

    #[tokio::test]
    async fn test_never_exceeds_limit() {
        let prober = Arc::new(CountingProber::default());
        let dispatcher = Dispatcher::new(prober.clone(), 2);

        let mut tasks = tokio::task::JoinSet::new();
        for i in 0..5 {
            let dispatcher = dispatcher.clone();
            tasks.spawn(async move { dispatcher.dispatch(Path::new(&format!("{i}.mp4"))).await });
        }

        while let Some(outcome) = tasks.join_next().await {
            assert_eq!(outcome.unwrap(), ProbeOutcome::Duration(1.0));
        }

        assert_eq!(prober.calls.load(Ordering::SeqCst), 5);
        assert!(prober.peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(prober.in_flight.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_releases_slot() {
        let dispatcher = Dispatcher::new(Arc::new(FailingProber), 1);

        // With one slot, the second call only completes if the first released it.
        assert_eq!(dispatcher.dispatch(Path::new("a.mp4")).await, ProbeOutcome::ProbeFailed);
        assert_eq!(dispatcher.dispatch(Path::new("b.mp4")).await, ProbeOutcome::ProbeFailed);
        assert_eq!(dispatcher.semaphore.available_permits(), 1);
    }
}
