//! Port contracts for the dev tracker.

pub mod error;
pub mod feedback;
pub mod images;
pub mod repository;

pub use error::{DevStoreError, DevStoreResult};
pub use feedback::FeedbackGateway;
pub use images::{ImageStore, ImageUpload};
pub use repository::DevItemRepository;

#[cfg(test)]
pub use images::MockImageStore;
