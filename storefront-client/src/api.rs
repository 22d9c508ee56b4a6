//! Backend seam used by the session runtime

use crate::{ClientResult, HttpClient};
use async_trait::async_trait;
use shared::order::{Order, OrderSubmission, PlaceOrderResponse};
use shared::reservation::{ReservationConfirmation, ReservationRequest};

/// The three REST calls a table session makes
#[async_trait]
pub trait OrderApi: Send + Sync + 'static {
    async fn fetch_order_history(&self, table_id: &str) -> ClientResult<Vec<Order>>;

    async fn place_order(&self, submission: &OrderSubmission) -> ClientResult<PlaceOrderResponse>;

    async fn reserve_table(&self, request: &ReservationRequest) -> ClientResult<ReservationConfirmation>;
}

#[async_trait]
impl OrderApi for HttpClient {
    async fn fetch_order_history(&self, table_id: &str) -> ClientResult<Vec<Order>> {
        HttpClient::fetch_order_history(self, table_id).await
    }

    async fn place_order(&self, submission: &OrderSubmission) -> ClientResult<PlaceOrderResponse> {
        HttpClient::place_order(self, submission).await
    }

    async fn reserve_table(&self, request: &ReservationRequest) -> ClientResult<ReservationConfirmation> {
        HttpClient::reserve_table(self, request).await
    }
}
