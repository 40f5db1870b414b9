//! Dashboard counters for the dev tracker.

use super::{DevItem, DevStatus};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of backlog health.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevMetrics {
    /// Items parked in the backlog.
    #[serde(default)]
    pub backlog: usize,
    /// Items waiting to be implemented.
    #[serde(default)]
    pub pending: usize,
    /// Items being implemented.
    #[serde(default)]
    pub in_progress: usize,
    /// Items waiting for a test.
    #[serde(default)]
    pub testing: usize,
    /// Items accepted.
    #[serde(default)]
    pub verified: usize,
    /// Failed tests across every item.
    #[serde(default)]
    pub total_failures: usize,
    /// Unverified items flagged as needing collaboration.
    #[serde(default)]
    pub needs_collab: usize,
    /// Items verified during the last seven days.
    #[serde(default)]
    pub verified_last_7_days: usize,
}

impl DevMetrics {
    /// Window counted by [`Self::verified_last_7_days`].
    pub const RECENT_DAYS: i64 = 7;

    /// Computes metrics for `items` as of `now`.
    #[must_use]
    pub fn compute(items: &[DevItem], now: DateTime<Utc>) -> Self {
        let cutoff = now - Duration::days(Self::RECENT_DAYS);
        items.iter().fold(Self::default(), |mut metrics, item| {
            *metrics.slot(item.status()) += 1;
            metrics.total_failures += item.fail_count();
            if item.requires_collab() && item.status() != DevStatus::Verified {
                metrics.needs_collab += 1;
            }
            let recently_verified = item.status() == DevStatus::Verified
                && item.completed_at().is_some_and(|at| at >= cutoff);
            if recently_verified {
                metrics.verified_last_7_days += 1;
            }
            metrics
        })
    }

    /// Returns the count for one status.
    #[must_use]
    pub const fn count(&self, status: DevStatus) -> usize {
        match status {
            DevStatus::Backlog => self.backlog,
            DevStatus::Pending => self.pending,
            DevStatus::InProgress => self.in_progress,
            DevStatus::Testing => self.testing,
            DevStatus::Verified => self.verified,
        }
    }

    /// Returns the number of items across every status.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.backlog + self.pending + self.in_progress + self.testing + self.verified
    }

    const fn slot(&mut self, status: DevStatus) -> &mut usize {
        match status {
            DevStatus::Backlog => &mut self.backlog,
            DevStatus::Pending => &mut self.pending,
            DevStatus::InProgress => &mut self.in_progress,
            DevStatus::Testing => &mut self.testing,
            DevStatus::Verified => &mut self.verified,
        }
    }
}
