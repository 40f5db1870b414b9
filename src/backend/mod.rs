//! HTTP plumbing shared by the REST store adapters.
//!
//! [`BackendClient`] owns the `reqwest` client, the base URL and the optional
//! bearer token. Every response passes through [`check_response`], which maps
//! non-success statuses into [`BackendError`] variants that line up with the
//! crate-wide [`ErrorKind`](crate::error::ErrorKind) taxonomy.

mod client;
mod error;

pub use client::{BackendClient, check_response};
pub use error::BackendError;
