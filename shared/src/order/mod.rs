//! Order types
//!
//! - `types`: the reconciled order view (history as shown to the table)
//! - `submission`: the payload posted when the cart is sent to the kitchen

pub mod submission;
pub mod types;

// Re-exports
pub use submission::{OrderSubmission, OrderedItem, PlaceOrderResponse};
pub use types::*;
