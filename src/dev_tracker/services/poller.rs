//! Background re-check of pending feedback.
//!
//! The poller runs as a tokio task on a fixed interval and publishes each
//! successful fetch on a watch channel. It stops when [`FeedbackPoller::shutdown`]
//! is awaited or when the handle is dropped. A fetch already underway is
//! allowed to finish.

use crate::dev_tracker::{
    domain::{FeedbackIntakeStatus, ProdFeedback},
    ports::{DevStoreResult, FeedbackGateway},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// Shortest accepted poll interval.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Result of one successful poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackSnapshot {
    /// Feedback waiting for review.
    pub pending: Vec<ProdFeedback>,
    /// Production intake state.
    pub intake: FeedbackIntakeStatus,
}

/// Handle to a running feedback poller.
#[derive(Debug)]
pub struct FeedbackPoller {
    shutdown_tx: watch::Sender<bool>,
    updates: watch::Receiver<Option<FeedbackSnapshot>>,
    handle: Option<JoinHandle<()>>,
}

impl FeedbackPoller {
    /// Spawns the poll loop on the current tokio runtime. The first poll runs
    /// immediately.
    #[must_use]
    pub fn spawn<G>(gateway: Arc<G>, interval: Duration) -> Self
    where
        G: FeedbackGateway + 'static,
    {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (updates_tx, updates) = watch::channel(None);
        let period = interval.max(MIN_POLL_INTERVAL);
        let handle = tokio::spawn(poll_loop(gateway, period, shutdown_rx, updates_tx));
        Self {
            shutdown_tx,
            updates,
            handle: Some(handle),
        }
    }

    /// Returns a receiver that sees every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<FeedbackSnapshot>> {
        self.updates.clone()
    }

    /// Returns the most recent snapshot, if a poll has succeeded yet.
    #[must_use]
    pub fn latest(&self) -> Option<FeedbackSnapshot> {
        self.updates.borrow().clone()
    }

    /// Reports whether the poll loop is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stops the loop and waits for it to exit.
    pub async fn shutdown(mut self) {
        self.request_stop();
        let Some(handle) = self.handle.take() else {
            return;
        };
        if let Err(err) = handle.await {
            warn!(error = %err, "feedback poller ended abnormally");
        }
    }

    fn request_stop(&self) {
        self.shutdown_tx.send_modify(|stop| *stop = true);
    }
}

impl Drop for FeedbackPoller {
    fn drop(&mut self) {
        self.request_stop();
    }
}

async fn poll_loop<G>(
    gateway: Arc<G>,
    period: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
    updates_tx: watch::Sender<Option<FeedbackSnapshot>>,
) where
    G: FeedbackGateway,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        if *shutdown_rx.borrow() {
            break;
        }
        tokio::select! {
            changed = shutdown_rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = ticker.tick() => match fetch(gateway.as_ref()).await {
                Ok(snapshot) => {
                    debug!(pending = snapshot.pending.len(), "polled feedback");
                    updates_tx.send_modify(|latest| *latest = Some(snapshot));
                }
                Err(err) => warn!(error = %err, "feedback poll failed"),
            },
        }
    }
    debug!("feedback poller stopped");
}

async fn fetch<G>(gateway: &G) -> DevStoreResult<FeedbackSnapshot>
where
    G: FeedbackGateway,
{
    let pending = gateway.list_pending().await?;
    let intake = gateway.intake_status().await?;
    Ok(FeedbackSnapshot { pending, intake })
}
