//! Storefront client - REST, live feed and the table session runtime
//!
//! Wraps the pure cart and order book from `storefront-core` with the
//! network side: the dining REST endpoints, the dining socket, and the
//! [`TableSession`] that keeps a table's order history current.

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod feed;
pub mod http;
pub mod session;
pub mod validation;

pub use api::OrderApi;
pub use config::{ApiRoutes, ClientConfig, SessionConfig};
pub use context::TableContext;
pub use error::{ClientError, ClientResult};
pub use feed::{FeedConnector, FeedError, FeedStream, WsConnector};
pub use http::HttpClient;
pub use session::{SessionEvent, TableSession};

// Re-export core types for convenience
pub use storefront_core::{Cart, CartHandle, OrderBookHandle};
