//! HTTP client for the storefront REST API

use crate::{ClientConfig, ClientError, ClientResult, config::ApiRoutes};
use reqwest::{Client, IntoUrl, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use shared::order::{Order, OrderSubmission, PlaceOrderResponse, parse_order_history};
use shared::reservation::{ReservationConfirmation, ReservationRequest};
use tracing::{debug, instrument};

/// HTTP client for the dining and reservation endpoints
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    routes: ApiRoutes,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout_duration())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
            routes: config.routes.clone(),
        })
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the current token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// GET a JSON body without assuming its shape
    pub async fn get_json(&self, path: &str) -> ClientResult<Value> {
        self.get_url(self.url(path)).await
    }

    async fn get_url(&self, url: impl IntoUrl) -> ClientResult<Value> {
        let request = self.authorized(self.client.get(url));
        Self::handle_response(request.send().await?).await
    }

    /// POST a JSON body and return the response body without assuming its shape
    pub async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<Value> {
        let request = self.authorized(self.client.post(self.url(path)).json(body));
        Self::handle_response(request.send().await?).await
    }

    /// Map error statuses; an empty success body reads as `null`
    async fn handle_response(response: reqwest::Response) -> ClientResult<Value> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::from_status(status, text));
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    // ========== Dining API ==========

    /// Order history for a table, normalized to canonical orders
    #[instrument(skip(self))]
    pub async fn fetch_order_history(&self, table_id: &str) -> ClientResult<Vec<Order>> {
        let url = self.routes.order_history_url(&self.base_url, table_id)?;
        let body = self.get_url(url).await?;
        let orders = parse_order_history(body)
            .map_err(|e| ClientError::InvalidResponse(format!("order history: {e}")))?;
        debug!(count = orders.len(), "Fetched order history");
        Ok(orders)
    }

    /// Submit an order
    #[instrument(skip(self, submission), fields(table_id = %submission.table_id, items = submission.ordered_items.len()))]
    pub async fn place_order(&self, submission: &OrderSubmission) -> ClientResult<PlaceOrderResponse> {
        let body = self.post_json(&self.routes.place_order, submission).await?;
        Ok(PlaceOrderResponse::from_value(body))
    }

    // ========== Reservation API ==========

    #[instrument(skip(self, request), fields(restaurant_id = %request.restaurant_id))]
    pub async fn reserve_table(&self, request: &ReservationRequest) -> ClientResult<ReservationConfirmation> {
        let body = self.post_json(&self.routes.reservations, request).await?;
        Ok(serde_json::from_value(body).unwrap_or_default())
    }
}
