//! Domain model for dev items and production feedback.

mod error;
mod feedback;
mod ids;
mod item;
mod metrics;
mod priority;
mod sorting;
mod status;

pub use error::{DevDomainError, ParseDevValueError};
pub use feedback::{
    FeedbackIntakeStatus, FeedbackReview, FeedbackStatus, FeedbackType, ProdFeedback,
    ReviewAction,
};
pub use ids::{DevItemId, FeedbackId, ImageId};
pub use item::{
    DevImage, DevItem, DevItemDraft, DevItemPatch, DevItemTitle, FailRecord, PersistedDevItemData,
};
pub use metrics::DevMetrics;
pub use priority::DevPriority;
pub use sorting::{
    CompletionDay, ImplementSort, TestingSort, VerifiedGroup, group_verified, sort_testing,
    sort_to_implement,
};
pub use status::{DevAction, DevStatus};
