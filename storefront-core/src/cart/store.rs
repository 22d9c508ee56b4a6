//! Cart store
//!
//! Line items are matched by identity (product + modifier set), never by
//! product id alone: two pizzas with different toppings are two entries.
//! There are deliberately no "by product id" operations.

use crate::identity::{compute_identity_key, same_item};
use crate::money::{PricedLine, lines_total};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::cart::{CartItemInput, CartLineItem};
use tracing::debug;

/// In-dining cart
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    items: Vec<CartLineItem>,
    drawer_open: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    table_id: Option<String>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty cart bound to a table session
    pub fn for_table(table_id: impl Into<String>) -> Self {
        Self {
            table_id: Some(table_id.into()),
            ..Self::default()
        }
    }

    // ========== Mutations ==========

    /// Add an item, merging with an existing entry of the same identity
    ///
    /// A match accumulates `new_item.quantity`; otherwise a new entry is
    /// appended with its identity key and the cart's table id as default.
    /// The drawer opens either way. Quantities are not validated here.
    pub fn add_item(&mut self, new_item: CartItemInput) {
        if let Some(existing) = self.items.iter_mut().find(|i| same_item(i, &new_item)) {
            existing.quantity = existing.quantity.saturating_add(new_item.quantity);
            debug!(
                identity_key = %existing.identity_key,
                added = new_item.quantity,
                quantity = existing.quantity,
                "Merged cart item"
            );
        } else {
            let identity_key = compute_identity_key(&new_item.base_id, &new_item.selected_modifiers);
            let mut item = CartLineItem::from_input(new_item, identity_key);
            if item.table_id.is_none() {
                item.table_id = self.table_id.clone();
            }
            debug!(
                identity_key = %item.identity_key,
                base_id = %item.base_id,
                quantity = item.quantity,
                "Added cart item"
            );
            self.items.push(item);
        }
        self.drawer_open = true;
    }

    /// Remove the entry matching `item`'s identity; returns whether one was removed
    pub fn remove_item(&mut self, item: &CartItemInput) -> bool {
        match self.position(item) {
            Some(idx) => {
                let removed = self.items.remove(idx);
                debug!(identity_key = %removed.identity_key, "Removed cart item");
                true
            }
            None => false,
        }
    }

    /// Set the quantity of the entry matching `item`
    ///
    /// `quantity <= 0` removes the entry. Returns whether an entry matched.
    pub fn update_quantity(&mut self, item: &CartItemInput, quantity: i32) -> bool {
        if quantity <= 0 {
            return self.remove_item(item);
        }
        match self.position(item) {
            Some(idx) => {
                self.items[idx].quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Set the drawer to `explicit`, or flip it; returns the new state
    pub fn toggle_drawer(&mut self, explicit: Option<bool>) -> bool {
        self.drawer_open = explicit.unwrap_or(!self.drawer_open);
        self.drawer_open
    }

    /// Remove every line item; the drawer and table binding are untouched
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Take back the lines of an accepted submission
    ///
    /// Each submitted line is matched by identity key and its submitted
    /// quantity subtracted; entries left at zero or below are removed.
    /// Items added after the snapshot was taken stay in the cart.
    pub fn remove_submitted(&mut self, submitted: &[CartLineItem]) {
        for line in submitted {
            let Some(idx) = self
                .items
                .iter()
                .position(|i| i.identity_key == line.identity_key)
            else {
                continue;
            };
            let remaining = self.items[idx].quantity.saturating_sub(line.quantity);
            if remaining <= 0 {
                self.items.remove(idx);
            } else {
                self.items[idx].quantity = remaining;
            }
        }
        debug!(submitted = submitted.len(), left = self.items.len(), "Removed submitted lines");
    }

    pub fn set_table_id(&mut self, table_id: Option<String>) {
        self.table_id = table_id;
    }

    // ========== Queries ==========

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_drawer_open(&self) -> bool {
        self.drawer_open
    }

    pub fn table_id(&self) -> Option<&str> {
        self.table_id.as_deref()
    }

    /// Total number of units across all entries
    pub fn item_count(&self) -> i32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Sum of line totals, unrounded
    pub fn subtotal(&self) -> Decimal {
        lines_total(&self.items)
    }

    /// Line total of the entry matching `item`, if present
    pub fn line_total_of(&self, item: &CartItemInput) -> Option<Decimal> {
        self.position(item).map(|idx| self.items[idx].line_total())
    }

    fn position(&self, item: &CartItemInput) -> Option<usize> {
        self.items.iter().position(|i| same_item(i, item))
    }
}
