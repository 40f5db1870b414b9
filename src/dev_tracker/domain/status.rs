//! Dev item statuses and the actions that move between them.

use super::ParseDevValueError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a dev item is in the delivery pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DevStatus {
    /// Parked; not planned yet.
    Backlog,
    /// Waiting to be implemented.
    #[default]
    Pending,
    /// Being implemented.
    InProgress,
    /// Implemented and waiting for a test.
    Testing,
    /// Tested and accepted. Older records call this `done`.
    #[serde(alias = "done")]
    Verified,
}

impl DevStatus {
    /// Every status, in pipeline order.
    pub const ALL: [Self; 5] = [
        Self::Backlog,
        Self::Pending,
        Self::InProgress,
        Self::Testing,
        Self::Verified,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Testing => "testing",
            Self::Verified => "verified",
        }
    }

    /// Reports whether the item belongs on the to-implement list.
    #[must_use]
    pub const fn is_to_implement(self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }

    /// Returns the actions permitted from this status.
    #[must_use]
    pub const fn available_actions(self) -> &'static [DevAction] {
        match self {
            Self::Backlog => &[DevAction::FromBacklog],
            Self::Pending => &[
                DevAction::Start,
                DevAction::PromoteToTesting,
                DevAction::ToBacklog,
            ],
            Self::InProgress => &[DevAction::PromoteToTesting, DevAction::ToBacklog],
            Self::Testing => &[DevAction::Verify, DevAction::Fail, DevAction::ToBacklog],
            Self::Verified => &[DevAction::Reopen],
        }
    }
}

impl fmt::Display for DevStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for DevStatus {
    type Error = ParseDevValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("done") {
            return Ok(Self::Verified);
        }
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseDevValueError {
                field: "status",
                value: value.to_owned(),
            })
    }
}

/// Explicit status change on a dev item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DevAction {
    /// pending → in progress
    Start,
    /// pending or in progress → testing
    PromoteToTesting,
    /// testing → verified
    Verify,
    /// testing → pending, recording why
    Fail,
    /// verified → testing
    Reopen,
    /// pending, in progress or testing → backlog
    ToBacklog,
    /// backlog → pending
    FromBacklog,
}

impl DevAction {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::PromoteToTesting => "promote_to_testing",
            Self::Verify => "verify",
            Self::Fail => "fail",
            Self::Reopen => "reopen",
            Self::ToBacklog => "to_backlog",
            Self::FromBacklog => "from_backlog",
        }
    }

    /// Reports whether the action may start from `status`.
    #[must_use]
    pub const fn permits(self, status: DevStatus) -> bool {
        match self {
            Self::Start => matches!(status, DevStatus::Pending),
            Self::PromoteToTesting => status.is_to_implement(),
            Self::Verify | Self::Fail => matches!(status, DevStatus::Testing),
            Self::Reopen => matches!(status, DevStatus::Verified),
            Self::ToBacklog => matches!(
                status,
                DevStatus::Pending | DevStatus::InProgress | DevStatus::Testing
            ),
            Self::FromBacklog => matches!(status, DevStatus::Backlog),
        }
    }

    /// Returns the status this action leads to.
    #[must_use]
    pub const fn target(self) -> DevStatus {
        match self {
            Self::Start => DevStatus::InProgress,
            Self::PromoteToTesting | Self::Reopen => DevStatus::Testing,
            Self::Verify => DevStatus::Verified,
            Self::Fail | Self::FromBacklog => DevStatus::Pending,
            Self::ToBacklog => DevStatus::Backlog,
        }
    }
}

impl fmt::Display for DevAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
