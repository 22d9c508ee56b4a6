//! Shared types for the storefront workspace
//!
//! Wire and domain types used by both the pure cart/order logic and the
//! network client: cart line items, orders, order submissions, socket
//! messages and reservations.

pub mod cart;
pub mod message;
pub mod order;
pub mod reservation;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use cart::{CartItemInput, CartLineItem, ModifierOption, ProductId, SelectedModifier};
pub use message::{DiningMessage, FeedSignal};
pub use order::{Order, OrderItem, OrderStatus, OrderSubmission};
pub use reservation::{ReservationConfirmation, ReservationRequest};
