//! Cancellable polling task that watches for an approval flag.
//!
//! One probe is in flight at a time; the next probe is scheduled a fixed
//! interval after the previous one completes. The task ends in exactly one of
//! three ways: the flag came back `true`, a probe failed, or the caller
//! cancelled it. A probe failure is terminal; there is no retry or backoff.

use std::{fmt::Display, future::Future, time::Duration};

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::sleep,
};
use tracing::debug;

/// Terminal outcome of a polling run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// A probe reported the watched flag as set.
    Approved,
    /// A probe failed; carries the failure text for display.
    Failed(String),
    /// The caller cancelled the run.
    Cancelled,
}

/// Poll `probe` every `interval` until it reports approval, fails, or the
/// `cancelled` channel flips to `true` (or its sender goes away).
pub async fn poll_until_approved<F, Fut, E>(
    interval: Duration,
    mut cancelled: watch::Receiver<bool>,
    mut probe: F,
) -> PollOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, E>>,
    E: Display,
{
    loop {
        if *cancelled.borrow() {
            return PollOutcome::Cancelled;
        }

        let result = tokio::select! {
            result = probe() => result,
            _ = wait_for_cancel(&mut cancelled) => return PollOutcome::Cancelled,
        };

        match result {
            Ok(true) => return PollOutcome::Approved,
            Ok(false) => {
                debug!("status not approved yet; scheduling next probe");
                tokio::select! {
                    _ = sleep(interval) => {}
                    _ = wait_for_cancel(&mut cancelled) => return PollOutcome::Cancelled,
                }
            }
            Err(err) => return PollOutcome::Failed(err.to_string()),
        }
    }
}

/// Resolve once cancellation is requested or the sender is gone.
async fn wait_for_cancel(cancelled: &mut watch::Receiver<bool>) {
    loop {
        if *cancelled.borrow() {
            return;
        }
        if cancelled.changed().await.is_err() {
            // Sender dropped: nobody can observe the outcome anymore.
            return;
        }
    }
}

/// Handle on a spawned polling task.
pub struct StatusPoller {
    cancel: watch::Sender<bool>,
    task: JoinHandle<PollOutcome>,
}

impl StatusPoller {
    /// Spawn a polling task on the current runtime.
    pub fn spawn<F, Fut, E>(interval: Duration, probe: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<bool, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let (cancel, cancelled) = watch::channel(false);
        let task = tokio::spawn(poll_until_approved(interval, cancelled, probe));
        Self { cancel, task }
    }

    /// Request cancellation; the task resolves with [`PollOutcome::Cancelled`].
    pub fn cancel(&self) {
        let _ = self.cancel.send(true);
    }

    /// Wait for the task's terminal outcome.
    pub async fn outcome(self) -> PollOutcome {
        self.task
            .await
            .unwrap_or_else(|err| PollOutcome::Failed(format!("poller task failed: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use tokio::time::Instant;

    use super::*;

    const INTERVAL: Duration = Duration::from_secs(4);

    fn counting_probe(
        results: Vec<Result<bool, String>>,
    ) -> (Arc<AtomicUsize>, impl FnMut() -> std::future::Ready<Result<bool, String>>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let probe = move || {
            let index = counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(results[index.min(results.len() - 1)].clone())
        };
        (calls, probe)
    }

    #[tokio::test(start_paused = true)]
    async fn stops_probing_once_approved() {
        let (_tx, cancelled) = watch::channel(false);
        let (calls, probe) = counting_probe(vec![Ok(false), Ok(false), Ok(true)]);

        let outcome = poll_until_approved(INTERVAL, cancelled, probe).await;

        assert_eq!(outcome, PollOutcome::Approved);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_one_interval_between_probes() {
        let (_tx, cancelled) = watch::channel(false);
        let (calls, probe) = counting_probe(vec![
            Ok(false),
            Ok(false),
            Ok(false),
            Ok(false),
            Ok(false),
            Ok(true),
        ]);

        let started = Instant::now();
        let outcome = poll_until_approved(INTERVAL, cancelled, probe).await;

        assert_eq!(outcome, PollOutcome::Approved);
        assert_eq!(calls.load(Ordering::SeqCst), 6);
        // Five not-yet-approved probes each schedule exactly one follow-up.
        assert_eq!(started.elapsed(), INTERVAL * 5);
    }

    #[tokio::test(start_paused = true)]
    async fn probe_failure_is_terminal() {
        let (_tx, cancelled) = watch::channel(false);
        let (calls, probe) = counting_probe(vec![Err("boom".to_owned())]);

        let outcome = poll_until_approved(INTERVAL, cancelled, probe).await;

        assert_eq!(outcome, PollOutcome::Failed("boom".to_owned()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_after_some_polls_reports_once() {
        let (_tx, cancelled) = watch::channel(false);
        let (calls, probe) = counting_probe(vec![Ok(false), Err("status endpoint 404".to_owned())]);

        let outcome = poll_until_approved(INTERVAL, cancelled, probe).await;

        assert_eq!(
            outcome,
            PollOutcome::Failed("status endpoint 404".to_owned())
        );
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_wins_over_waiting() {
        let handle = StatusPoller::spawn(INTERVAL, || std::future::ready(Ok::<_, String>(false)));

        handle.cancel();
        let outcome = handle.outcome().await;

        assert_eq!(outcome, PollOutcome::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn spawned_poller_reports_approval() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let handle = StatusPoller::spawn(INTERVAL, move || {
            let approved = counter.fetch_add(1, Ordering::SeqCst) >= 2;
            std::future::ready(Ok::<_, String>(approved))
        });

        let outcome = handle.outcome().await;

        assert_eq!(outcome, PollOutcome::Approved);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
