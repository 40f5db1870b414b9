//! Domain model for supply requests.

mod error;
mod ids;
mod quantity;
mod request;
mod status;

pub use error::SupplyDomainError;
pub use ids::SupplyRequestId;
pub use quantity::Quantity;
pub use request::{
    ItemName, PersistedSupplyRequestData, SupplyEdit, SupplyRequest, SupplyRequestFilter,
};
pub use status::{ParseSupplyStatusError, SupplyAction, SupplyStatus};
