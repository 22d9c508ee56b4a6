//! Client and session configuration
//!
//! # Environment variables
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | STOREFRONT_API_URL | http://localhost:8080 | REST base URL |
//! | STOREFRONT_API_TOKEN | (none) | Bearer token |
//! | STOREFRONT_TIMEOUT_SECS | 30 | Request timeout |
//! | STOREFRONT_WS_URL | ws://localhost:8080 | Socket base URL |
//! | STOREFRONT_RESTAURANT_ID | (empty) | Tenant the feed listens to |
//! | STOREFRONT_PARENT_RESTAURANT_ID | (none) | Franchise parent |
//! | STOREFRONT_POLL_SECS | 15 | Order history poll interval |
//! | STOREFRONT_FEED_RECYCLE_SECS | 300 | Socket recreation cadence |
//! | STOREFRONT_RECONNECT_DELAY_MS | 1000 | Delay before reconnecting |
//! | STOREFRONT_EVENT_CAPACITY | 64 | Session event buffer |

use crate::{ClientError, ClientResult};
use reqwest::Url;
use std::str::FromStr;
use std::time::Duration;

/// Placeholder replaced by the table id in [`ApiRoutes::order_history`]
pub const TABLE_ID_PLACEHOLDER: &str = "{table_id}";

/// REST paths, relative to the base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRoutes {
    /// Order history for one table; contains [`TABLE_ID_PLACEHOLDER`]
    pub order_history: String,
    pub place_order: String,
    pub reservations: String,
}

impl Default for ApiRoutes {
    fn default() -> Self {
        Self {
            order_history: "/api/dining/orders/{table_id}".to_string(),
            place_order: "/api/dining/orders".to_string(),
            reservations: "/api/reservations".to_string(),
        }
    }
}

impl ApiRoutes {
    /// History URL for a table under `base_url`
    ///
    /// The table id fills the placeholder as a single percent-encoded path
    /// segment, so `/`, `?` and spaces in it cannot change the route.
    pub fn order_history_url(&self, base_url: &str, table_id: &str) -> ClientResult<Url> {
        let mut url = parse_base(base_url)?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ClientError::InvalidUrl(base_url.to_string()))?;
            segments.pop_if_empty();
            for segment in self.order_history.split('/').filter(|s| !s.is_empty()) {
                if segment == TABLE_ID_PLACEHOLDER {
                    segments.push(table_id);
                } else {
                    segments.push(segment);
                }
            }
        }
        Ok(url)
    }
}

fn parse_base(base_url: &str) -> ClientResult<Url> {
    Url::parse(base_url.trim()).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))
}

/// REST client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "https://api.example.com")
    pub base_url: String,

    /// Bearer token
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    pub routes: ApiRoutes,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: 30,
            routes: ApiRoutes::default(),
        }
    }

    /// Load from `STOREFRONT_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key/value source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new(
            lookup("STOREFRONT_API_URL").unwrap_or_else(|| "http://localhost:8080".into()),
        );
        config.token = lookup("STOREFRONT_API_TOKEN").filter(|t| !t.trim().is_empty());
        config.timeout = parsed(&lookup, "STOREFRONT_TIMEOUT_SECS").unwrap_or(config.timeout);
        config
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = secs;
        self
    }

    pub fn with_routes(mut self, routes: ApiRoutes) -> Self {
        self.routes = routes;
        self
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}

/// Table session runtime configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Tenant whose dining feed is subscribed to
    pub restaurant_id: String,
    /// Franchise parent, forwarded on submissions
    pub parent_restaurant_id: Option<String>,
    /// Socket base URL (e.g., "wss://api.example.com")
    pub ws_base_url: String,
    /// Order history poll interval
    pub poll_interval: Duration,
    /// The socket is torn down and recreated on this cadence
    pub feed_recycle_interval: Duration,
    /// Pause between teardown and reconnect
    pub reconnect_delay: Duration,
    /// Buffer size of the session event channel
    pub event_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            restaurant_id: String::new(),
            parent_restaurant_id: None,
            ws_base_url: "ws://localhost:8080".to_string(),
            poll_interval: Duration::from_secs(15),
            feed_recycle_interval: Duration::from_secs(5 * 60),
            reconnect_delay: Duration::from_secs(1),
            event_capacity: 64,
        }
    }
}

impl SessionConfig {
    pub fn new(restaurant_id: impl Into<String>) -> Self {
        Self {
            restaurant_id: restaurant_id.into(),
            ..Self::default()
        }
    }

    /// Load from `STOREFRONT_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            restaurant_id: lookup("STOREFRONT_RESTAURANT_ID").unwrap_or_default(),
            parent_restaurant_id: lookup("STOREFRONT_PARENT_RESTAURANT_ID")
                .filter(|v| !v.trim().is_empty()),
            ws_base_url: lookup("STOREFRONT_WS_URL").unwrap_or(defaults.ws_base_url),
            poll_interval: parsed(&lookup, "STOREFRONT_POLL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.poll_interval),
            feed_recycle_interval: parsed(&lookup, "STOREFRONT_FEED_RECYCLE_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.feed_recycle_interval),
            reconnect_delay: parsed(&lookup, "STOREFRONT_RECONNECT_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.reconnect_delay),
            event_capacity: parsed(&lookup, "STOREFRONT_EVENT_CAPACITY")
                .unwrap_or(defaults.event_capacity),
        }
    }

    pub fn with_parent_restaurant_id(mut self, id: impl Into<String>) -> Self {
        self.parent_restaurant_id = Some(id.into());
        self
    }

    pub fn with_ws_base_url(mut self, url: impl Into<String>) -> Self {
        self.ws_base_url = url.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_feed_recycle_interval(mut self, interval: Duration) -> Self {
        self.feed_recycle_interval = interval;
        self
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Socket URL: `{ws_base}/ws?restaurant_id={id}`, with the id query-encoded
    pub fn feed_url(&self) -> ClientResult<Url> {
        let mut url = parse_base(&self.ws_base_url)?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.ws_base_url.clone()))?
            .pop_if_empty()
            .push("ws");
        url.query_pairs_mut()
            .clear()
            .append_pair("restaurant_id", &self.restaurant_id);
        Ok(url)
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}
