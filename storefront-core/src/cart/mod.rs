//! Cart store and its shared handle
//!
//! The cart is tab-scoped state read by many views. Collaborators receive a
//! [`CartHandle`] instead of reaching for a global: every mutation goes
//! through the handle and holds the write lock for its whole duration.

mod store;

pub use store::Cart;

use parking_lot::RwLock;
use shared::cart::{CartItemInput, CartLineItem};
use std::sync::Arc;

/// Cloneable handle to one cart
#[derive(Debug, Clone, Default)]
pub struct CartHandle {
    inner: Arc<RwLock<Cart>>,
}

impl CartHandle {
    pub fn new(cart: Cart) -> Self {
        Self {
            inner: Arc::new(RwLock::new(cart)),
        }
    }

    pub fn add_item(&self, item: CartItemInput) {
        self.inner.write().add_item(item);
    }

    pub fn remove_item(&self, item: &CartItemInput) -> bool {
        self.inner.write().remove_item(item)
    }

    pub fn update_quantity(&self, item: &CartItemInput, quantity: i32) -> bool {
        self.inner.write().update_quantity(item, quantity)
    }

    pub fn toggle_drawer(&self, explicit: Option<bool>) -> bool {
        self.inner.write().toggle_drawer(explicit)
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }

    pub fn remove_submitted(&self, submitted: &[CartLineItem]) {
        self.inner.write().remove_submitted(submitted);
    }

    pub fn set_table_id(&self, table_id: Option<String>) {
        self.inner.write().set_table_id(table_id);
    }

    /// Run a read-only closure against the cart
    pub fn read<R>(&self, f: impl FnOnce(&Cart) -> R) -> R {
        f(&self.inner.read())
    }

    /// Owned copy of the current cart
    pub fn snapshot(&self) -> Cart {
        self.inner.read().clone()
    }
}
