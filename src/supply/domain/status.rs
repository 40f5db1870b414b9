//! Supply request statuses and the actions that move between them.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error returned when a status string is not recognised.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown supply request status: {0}")]
pub struct ParseSupplyStatusError(pub String);

/// Where a supply request is in the approval pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplyStatus {
    /// Waiting for a decision.
    #[default]
    Pending,
    /// Approved for purchase.
    Approved,
    /// Bought, not yet handed over.
    Purchased,
    /// Handed to the worker.
    Delivered,
    /// Turned down.
    Denied,
}

impl SupplyStatus {
    /// Every status, in pipeline order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Approved,
        Self::Purchased,
        Self::Delivered,
        Self::Denied,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Purchased => "purchased",
            Self::Delivered => "delivered",
            Self::Denied => "denied",
        }
    }

    /// Reports whether the request has left the active pipeline.
    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Delivered | Self::Denied)
    }

    /// Returns the actions permitted from this status.
    #[must_use]
    pub const fn available_actions(self) -> &'static [SupplyAction] {
        match self {
            Self::Pending => &[SupplyAction::Approve, SupplyAction::Deny],
            Self::Approved => &[SupplyAction::MarkPurchased, SupplyAction::RevertToPending],
            Self::Purchased => &[SupplyAction::MarkDelivered, SupplyAction::RevertToApproved],
            Self::Delivered => &[SupplyAction::RevertToPurchased],
            Self::Denied => &[SupplyAction::Reopen],
        }
    }
}

impl fmt::Display for SupplyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SupplyStatus {
    type Error = ParseSupplyStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| ParseSupplyStatusError(value.to_owned()))
    }
}

/// Explicit action on a supply request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplyAction {
    /// pending → approved
    Approve,
    /// pending → denied
    Deny,
    /// approved → purchased
    MarkPurchased,
    /// approved → pending
    RevertToPending,
    /// purchased → delivered
    MarkDelivered,
    /// purchased → approved
    RevertToApproved,
    /// delivered → purchased
    RevertToPurchased,
    /// denied → pending
    Reopen,
}

impl SupplyAction {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Deny => "deny",
            Self::MarkPurchased => "mark_purchased",
            Self::RevertToPending => "revert_to_pending",
            Self::MarkDelivered => "mark_delivered",
            Self::RevertToApproved => "revert_to_approved",
            Self::RevertToPurchased => "revert_to_purchased",
            Self::Reopen => "reopen",
        }
    }

    /// Returns the single status this action starts from.
    #[must_use]
    pub const fn source(self) -> SupplyStatus {
        match self {
            Self::Approve | Self::Deny => SupplyStatus::Pending,
            Self::MarkPurchased | Self::RevertToPending => SupplyStatus::Approved,
            Self::MarkDelivered | Self::RevertToApproved => SupplyStatus::Purchased,
            Self::RevertToPurchased => SupplyStatus::Delivered,
            Self::Reopen => SupplyStatus::Denied,
        }
    }

    /// Returns the status this action leads to.
    #[must_use]
    pub const fn target(self) -> SupplyStatus {
        match self {
            Self::Approve | Self::RevertToApproved => SupplyStatus::Approved,
            Self::Deny => SupplyStatus::Denied,
            Self::MarkPurchased | Self::RevertToPurchased => SupplyStatus::Purchased,
            Self::RevertToPending | Self::Reopen => SupplyStatus::Pending,
            Self::MarkDelivered => SupplyStatus::Delivered,
        }
    }
}

impl fmt::Display for SupplyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
