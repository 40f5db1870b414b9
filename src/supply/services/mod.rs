//! Application services for supply requests.

mod requests;

pub use requests::{
    CreateSupplyRequest, EditSupplyRequest, SupplyRequestError, SupplyRequestResult,
    SupplyRequestService,
};
