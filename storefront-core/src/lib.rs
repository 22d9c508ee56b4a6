//! Storefront core - in-dining cart and order reconciliation
//!
//! Pure, I/O-free logic shared by every storefront template:
//! - `identity`: modifier-aware cart item identity
//! - `cart`: the cart store and its shared handle
//! - `money`: the line-total formula and display rounding
//! - `assembler`: cart -> order submission
//! - `reconciler`: the order book fed by polls and socket signals

pub mod assembler;
pub mod cart;
pub mod identity;
pub mod money;
pub mod reconciler;

pub use assembler::{SPICE_LEVEL_MODIFIER, build_submission};
pub use cart::{Cart, CartHandle};
pub use identity::{compute_identity_key, same_item};
pub use reconciler::{FeedReaction, OrderBook, OrderBookHandle, OrderChange};
