//! Live dining feed
//!
//! A feed is a receive-only stream of text frames. The session runtime only
//! knows the [`FeedConnector`] seam; [`WsConnector`] is the socket
//! implementation, tests plug in channels.

mod ws;

pub use ws::WsConnector;

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;

/// Feed error type
#[derive(Debug, Error)]
pub enum FeedError {
    /// Could not establish the connection
    #[error("Feed connection failed: {0}")]
    Connection(String),

    /// The connection broke mid-stream
    #[error("Feed protocol error: {0}")]
    Protocol(String),

    /// The server closed the connection
    #[error("Feed closed by server")]
    Closed,
}

/// Text frames in arrival order; ends when the connection is gone
pub type FeedStream = Pin<Box<dyn Stream<Item = Result<String, FeedError>> + Send>>;

/// Opens one feed connection per call
#[async_trait]
pub trait FeedConnector: Send + Sync + 'static {
    async fn connect(&self, url: &str) -> Result<FeedStream, FeedError>;
}
