use super::{FeedConnector, FeedError, FeedStream};
use async_trait::async_trait;
use futures::StreamExt;
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::debug;

/// WebSocket feed over `tokio-tungstenite`
///
/// Pings are answered by the socket library while the stream is polled.
/// Binary and pong frames are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

impl WsConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FeedConnector for WsConnector {
    async fn connect(&self, url: &str) -> Result<FeedStream, FeedError> {
        let (ws_stream, _response) = tokio_tungstenite::connect_async(url)
            .await
            .map_err(|e| match e {
                tungstenite::Error::Http(ref resp) => {
                    FeedError::Connection(format!("HTTP {}", resp.status()))
                }
                other => FeedError::Connection(other.to_string()),
            })?;
        debug!(%url, "Feed socket connected");

        let frames = ws_stream.filter_map(|msg| async move {
            match msg {
                Ok(Message::Text(text)) => Some(Ok(text.as_str().to_owned())),
                Ok(Message::Close(_)) => Some(Err(FeedError::Closed)),
                Ok(_) => None, // Binary, Ping, Pong, Frame
                Err(tungstenite::Error::ConnectionClosed) => Some(Err(FeedError::Closed)),
                Err(e) => Some(Err(FeedError::Protocol(e.to_string()))),
            }
        });
        Ok(Box::pin(frames))
    }
}
