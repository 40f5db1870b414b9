//! Error classification shared by every lifecycle service.
//!
//! Each bounded context keeps its own `thiserror` enums. Callers that only
//! need to decide how to present a failure ask the error for its
//! [`ErrorKind`].

use std::fmt;

/// Broad category of a failed lifecycle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required field was missing or malformed.
    Validation,
    /// The operation is incompatible with the current record state, or the
    /// same action is already in flight.
    Conflict,
    /// The referenced record no longer exists.
    NotFound,
    /// The backend could not be reached or failed to answer.
    Network,
}

impl ErrorKind {
    /// Returns a stable lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Conflict => "conflict",
            Self::NotFound => "not_found",
            Self::Network => "network",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
