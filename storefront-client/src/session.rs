//! Table session runtime
//!
//! One session per seated table. It owns three background tasks:
//!
//! 1. Poll: fetch the table's order history on a fixed interval (first
//!    fetch immediately) and replace the order book.
//! 2. Feed: hold one socket, turn frames into reactions. Any frame that
//!    says "something changed" requests a refetch; the payment sentinel also
//!    clears the cart. The socket is recreated on a fixed cadence; a socket
//!    that drops early waits for the next cadence tick.
//! 3. Refetch: runs requested refetches one at a time. Requests made while
//!    one is in flight collapse into a single follow-up fetch.
//!
//! Everything is tied to one `CancellationToken`. After [`TableSession::shutdown`]
//! (or drop) no task writes to the cart or the order book.

use crate::api::OrderApi;
use crate::context::TableContext;
use crate::feed::{FeedConnector, FeedError};
use crate::validation::validate_reservation;
use crate::{ClientError, ClientResult, SessionConfig};
use futures::StreamExt;
use rust_decimal::Decimal;
use shared::message::FeedSignal;
use shared::order::{OrderStatus, PlaceOrderResponse};
use shared::reservation::{ReservationConfirmation, ReservationRequest};
use std::sync::Arc;
use std::time::Duration;
use storefront_core::{Cart, CartHandle, FeedReaction, OrderBookHandle, OrderChange, build_submission};
use tokio::sync::{Notify, broadcast};
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Notifications for the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A fetched list replaced the order book
    OrdersRefreshed { count: usize, active_total: Decimal },
    OrderStatusChanged {
        order_id: String,
        from: OrderStatus,
        to: OrderStatus,
    },
    OrderVoided {
        order_id: String,
        reason: Option<String>,
    },
    /// The backend accepted a submission
    OrderPlaced { order_id: Option<String> },
    /// The bill was paid and the cart cleared
    PaymentSettled,
    /// A history fetch failed; the previous list is kept
    FetchFailed { error: String },
    FeedConnected,
    FeedDisconnected { reason: String },
}

impl From<OrderChange> for SessionEvent {
    fn from(change: OrderChange) -> Self {
        match change {
            OrderChange::StatusChanged { order_id, from, to } => {
                Self::OrderStatusChanged { order_id, from, to }
            }
            OrderChange::Voided { order_id, reason } => Self::OrderVoided { order_id, reason },
        }
    }
}

struct SessionInner {
    api: Arc<dyn OrderApi>,
    feed: Arc<dyn FeedConnector>,
    config: SessionConfig,
    table: TableContext,
    table_id: String,
    feed_url: String,
    cart: CartHandle,
    book: OrderBookHandle,
    events: broadcast::Sender<SessionEvent>,
    refetch: Notify,
    shutdown: CancellationToken,
}

/// Running in-dining session for one table
pub struct TableSession {
    inner: Arc<SessionInner>,
}

impl TableSession {
    /// Start a session with a fresh cart bound to the table
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        api: Arc<dyn OrderApi>,
        feed: Arc<dyn FeedConnector>,
        table: TableContext,
        config: SessionConfig,
    ) -> ClientResult<Self> {
        let table_id = table.table_id().ok_or(ClientError::MissingTable)?;
        let cart = CartHandle::new(Cart::for_table(table_id));
        Self::start_with_cart(api, feed, table, config, cart)
    }

    /// Start a session around an existing cart handle
    pub fn start_with_cart(
        api: Arc<dyn OrderApi>,
        feed: Arc<dyn FeedConnector>,
        table: TableContext,
        config: SessionConfig,
        cart: CartHandle,
    ) -> ClientResult<Self> {
        let table_id = table
            .table_id()
            .ok_or(ClientError::MissingTable)?
            .to_string();
        let feed_url = config.feed_url()?.to_string();
        cart.set_table_id(Some(table_id.clone()));

        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        let inner = Arc::new(SessionInner {
            api,
            feed,
            config,
            table,
            table_id,
            feed_url,
            cart,
            book: OrderBookHandle::default(),
            events,
            refetch: Notify::new(),
            shutdown: CancellationToken::new(),
        });

        tracing::info!(
            table_id = %inner.table_id,
            restaurant_id = %inner.config.restaurant_id,
            "Table session started"
        );
        tokio::spawn(poll_loop(Arc::clone(&inner)));
        tokio::spawn(feed_loop(Arc::clone(&inner)));
        tokio::spawn(refetch_loop(Arc::clone(&inner)));

        Ok(Self { inner })
    }

    pub fn cart(&self) -> CartHandle {
        self.inner.cart.clone()
    }

    pub fn orders(&self) -> OrderBookHandle {
        self.inner.book.clone()
    }

    pub fn table(&self) -> &TableContext {
        &self.inner.table
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }

    /// Fetch the history now and replace the order book
    pub async fn refresh(&self) -> ClientResult<()> {
        self.ensure_running()?;
        self.inner.refresh().await
    }

    /// Submit the cart as an order
    ///
    /// On success the submitted lines leave the cart, the echoed order (if
    /// any) is shown right away and a refetch is requested. Items added
    /// while the request was in flight stay. On failure the cart is kept.
    pub async fn submit_order(&self, special_request: &str) -> ClientResult<PlaceOrderResponse> {
        self.ensure_running()?;
        let inner = &self.inner;

        let cart = inner.cart.snapshot();
        if cart.is_empty() {
            return Err(ClientError::Validation("cart is empty".to_string()));
        }
        let submission = build_submission(
            &cart,
            inner.table_id.clone(),
            inner.config.restaurant_id.clone(),
            inner.config.parent_restaurant_id.clone(),
            special_request,
        );

        let response = match inner.api.place_order(&submission).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(table_id = %inner.table_id, error = %e, "Order submission failed, cart kept");
                return Err(e);
            }
        };
        // Only the submitted lines; later additions stay
        inner.cart.remove_submitted(cart.items());
        if inner.shutdown.is_cancelled() {
            return Ok(response);
        }

        let order_id = response.order.as_ref().map(|o| o.id.clone());
        if let Some(order) = &response.order {
            inner.book.record_placed(order.clone());
        }
        tracing::info!(table_id = %inner.table_id, order_id = ?order_id, "Order placed");
        inner.emit(SessionEvent::OrderPlaced { order_id });
        inner.request_refetch();

        Ok(response)
    }

    /// Validate and send a table reservation
    pub async fn reserve_table(&self, request: &ReservationRequest) -> ClientResult<ReservationConfirmation> {
        validate_reservation(request)?;
        self.inner.api.reserve_table(request).await
    }

    /// Stop polling, cancel in-flight refetches and close the socket
    pub fn shutdown(&self) {
        if !self.inner.shutdown.is_cancelled() {
            tracing::info!(table_id = %self.inner.table_id, "Table session shutting down");
            self.inner.shutdown.cancel();
        }
    }

    fn ensure_running(&self) -> ClientResult<()> {
        if self.is_shut_down() {
            return Err(ClientError::Internal("session is shut down".to_string()));
        }
        Ok(())
    }
}

impl Drop for TableSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl SessionInner {
    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    async fn refresh(&self) -> ClientResult<()> {
        let result = self.api.fetch_order_history(&self.table_id).await;
        if self.shutdown.is_cancelled() {
            return Ok(());
        }

        match result {
            Ok(orders) => {
                let changes = self.book.replace(orders);
                for change in changes {
                    self.emit(change.into());
                }
                let (count, active_total) = self.book.read(|b| (b.len(), b.active_total()));
                self.emit(SessionEvent::OrdersRefreshed { count, active_total });
                Ok(())
            }
            Err(e) => {
                tracing::warn!(table_id = %self.table_id, error = %e, "Order history fetch failed, keeping previous list");
                self.emit(SessionEvent::FetchFailed {
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Ask the refetch task for a fetch; at most one stays queued
    fn request_refetch(&self) {
        self.refetch.notify_one();
    }

    fn handle_frame(&self, text: &str) {
        let signal = FeedSignal::from_text(text);
        match self.book.react(&signal) {
            FeedReaction::Refetch => self.request_refetch(),
            FeedReaction::SettlePayment => {
                tracing::info!(table_id = %self.table_id, "Payment settled, clearing cart");
                self.cart.clear();
                self.emit(SessionEvent::PaymentSettled);
                self.request_refetch();
            }
            FeedReaction::Ignore => {}
        }
    }

    /// Sleep unless the session is cancelled first; false when cancelled
    async fn pause(&self, delay: Duration) -> bool {
        tokio::select! {
            _ = self.shutdown.cancelled() => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }

    async fn next_tick(&self, cadence: &mut Interval) -> bool {
        tokio::select! {
            _ = self.shutdown.cancelled() => false,
            _ = cadence.tick() => true,
        }
    }
}

/// `tokio::time::interval` rejects a zero period
fn non_zero(period: Duration) -> Duration {
    period.max(Duration::from_millis(1))
}

async fn poll_loop(inner: Arc<SessionInner>) {
    let mut interval = tokio::time::interval(non_zero(inner.config.poll_interval));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = inner.shutdown.cancelled() => break,
            _ = interval.tick() => {
                // Errors are already reported as events
                let _ = inner.refresh().await;
            }
        }
    }
    tracing::debug!(table_id = %inner.table_id, "Poll loop stopped");
}

async fn refetch_loop(inner: Arc<SessionInner>) {
    loop {
        tokio::select! {
            _ = inner.shutdown.cancelled() => break,
            _ = inner.refetch.notified() => {}
        }
        tokio::select! {
            _ = inner.shutdown.cancelled() => break,
            _ = inner.refresh() => {}
        }
    }
    tracing::debug!(table_id = %inner.table_id, "Refetch loop stopped");
}

/// Why a connected feed session ended
enum FeedExit {
    Cancelled,
    Recycle,
    Dropped(String),
}

async fn feed_loop(inner: Arc<SessionInner>) {
    let url = inner.feed_url.clone();
    let mut cadence = tokio::time::interval(non_zero(inner.config.feed_recycle_interval));
    cadence.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // First tick completes immediately
    cadence.tick().await;

    loop {
        let connected = tokio::select! {
            _ = inner.shutdown.cancelled() => break,
            result = inner.feed.connect(&url) => result,
        };

        let exit = match connected {
            Ok(mut stream) => {
                tracing::info!(%url, "Dining feed connected");
                inner.emit(SessionEvent::FeedConnected);

                let exit = loop {
                    tokio::select! {
                        _ = inner.shutdown.cancelled() => break FeedExit::Cancelled,
                        _ = cadence.tick() => break FeedExit::Recycle,
                        frame = stream.next() => match frame {
                            Some(Ok(text)) => inner.handle_frame(&text),
                            Some(Err(FeedError::Closed)) | None => {
                                break FeedExit::Dropped("closed by server".to_string());
                            }
                            Some(Err(e)) => break FeedExit::Dropped(e.to_string()),
                        },
                    }
                };
                drop(stream);

                let reason = match &exit {
                    FeedExit::Cancelled => "shutdown".to_string(),
                    FeedExit::Recycle => "recycle".to_string(),
                    FeedExit::Dropped(reason) => reason.clone(),
                };
                inner.emit(SessionEvent::FeedDisconnected { reason });
                exit
            }
            Err(e) => FeedExit::Dropped(e.to_string()),
        };

        match exit {
            FeedExit::Cancelled => break,
            FeedExit::Recycle => {
                tracing::debug!("Recycling dining feed");
            }
            FeedExit::Dropped(reason) => {
                tracing::warn!(%reason, "Dining feed unavailable, waiting for next cadence tick");
                if !inner.next_tick(&mut cadence).await {
                    break;
                }
            }
        }

        if !inner.pause(inner.config.reconnect_delay).await {
            break;
        }
    }
    tracing::debug!(table_id = %inner.table_id, "Feed loop stopped");
}
