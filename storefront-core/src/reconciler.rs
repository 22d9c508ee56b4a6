//! Order book reconciler
//!
//! The table's order list has two writers: the periodic poll, which
//! replaces the list wholesale, and the live feed, which only marks the
//! list dirty. Feed frames never edit orders in place; every change the
//! guest sees comes from a fetched list.
//!
//! Because a push-triggered fetch and a poll may be in flight together,
//! the last response to resolve wins. That is acceptable: both read the
//! same backend state.

use crate::money;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use shared::message::FeedSignal;
use shared::order::{Order, OrderStatus};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// What the runtime should do in response to a feed signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedReaction {
    /// The list is stale; fetch it again
    Refetch,
    /// The bill was paid; clear the cart, then fetch
    SettlePayment,
    /// Keep the current list
    Ignore,
}

/// Difference between two consecutive lists, for notifications
#[derive(Debug, Clone, PartialEq)]
pub enum OrderChange {
    StatusChanged {
        order_id: String,
        from: OrderStatus,
        to: OrderStatus,
    },
    Voided {
        order_id: String,
        reason: Option<String>,
    },
}

/// The table's reconciled order history
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    orders: Vec<Order>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list with a freshly fetched one
    ///
    /// Returns the changes relative to the previous list. Orders that are
    /// new to the book produce no change entry; a fresh order that is
    /// already void is reported as voided.
    pub fn replace(&mut self, orders: Vec<Order>) -> Vec<OrderChange> {
        let previous: HashMap<&str, &Order> =
            self.orders.iter().map(|o| (o.id.as_str(), o)).collect();

        let mut changes = Vec::new();
        for order in &orders {
            let before = previous.get(order.id.as_str());
            let was_void = before.is_some_and(|b| b.is_void());

            if order.is_void() && !was_void {
                changes.push(OrderChange::Voided {
                    order_id: order.id.clone(),
                    reason: order.void_reason.clone(),
                });
            } else if let Some(before) = before
                && before.status != order.status
                && !order.is_void()
            {
                changes.push(OrderChange::StatusChanged {
                    order_id: order.id.clone(),
                    from: before.status,
                    to: order.status,
                });
            }
        }

        debug!(
            previous = self.orders.len(),
            current = orders.len(),
            changes = changes.len(),
            "Order list replaced"
        );
        self.orders = orders;
        changes
    }

    /// Show an order echoed by the place-order response right away
    ///
    /// Replaces an entry with the same id; the next poll supersedes it.
    pub fn record_placed(&mut self, order: Order) {
        match self.orders.iter_mut().find(|o| o.id == order.id) {
            Some(existing) => *existing = order,
            None => {
                debug!(order_id = %order.id, "Recorded placed order");
                self.orders.push(order);
            }
        }
    }

    /// Map a feed signal to a reaction; the list itself is never touched
    pub fn react(&self, signal: &FeedSignal) -> FeedReaction {
        let reaction = match signal {
            FeedSignal::NewOrders | FeedSignal::OrderUpdates(_) => FeedReaction::Refetch,
            FeedSignal::PaymentStatusUpdated => FeedReaction::SettlePayment,
            FeedSignal::EmptyUpdate | FeedSignal::Ignored => FeedReaction::Ignore,
        };
        debug!(?reaction, "Feed signal classified");
        reaction
    }

    /// Amount owed across non-void, non-cancelled orders
    pub fn active_total(&self) -> Decimal {
        money::active_total(&self.orders)
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn get(&self, id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

/// Cloneable handle to one order book
#[derive(Debug, Clone, Default)]
pub struct OrderBookHandle {
    inner: Arc<RwLock<OrderBook>>,
}

impl OrderBookHandle {
    pub fn new(book: OrderBook) -> Self {
        Self {
            inner: Arc::new(RwLock::new(book)),
        }
    }

    pub fn replace(&self, orders: Vec<Order>) -> Vec<OrderChange> {
        self.inner.write().replace(orders)
    }

    pub fn record_placed(&self, order: Order) {
        self.inner.write().record_placed(order);
    }

    pub fn react(&self, signal: &FeedSignal) -> FeedReaction {
        self.inner.read().react(signal)
    }

    pub fn active_total(&self) -> Decimal {
        self.inner.read().active_total()
    }

    /// Owned copy of the current list
    pub fn orders(&self) -> Vec<Order> {
        self.inner.read().orders().to_vec()
    }

    pub fn get(&self, id: &str) -> Option<Order> {
        self.inner.read().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn read<R>(&self, f: impl FnOnce(&OrderBook) -> R) -> R {
        f(&self.inner.read())
    }
}
