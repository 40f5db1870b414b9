//! Orchestration services for dev items and feedback intake.

mod intake;
mod items;
mod poller;

pub use intake::{FeedbackIntakeError, FeedbackIntakeResult, FeedbackIntakeService};
pub use items::{
    CreateDevItemRequest, DevItemError, DevItemResult, DevItemService, EditDevItemRequest,
};
pub use poller::{FeedbackPoller, FeedbackSnapshot, MIN_POLL_INTERVAL};
