// storefront-client/demos/table_watch.rs
// Watch one table's orders until Ctrl-C
//
// STOREFRONT_API_URL=https://api.example.com STOREFRONT_WS_URL=wss://api.example.com \
// STOREFRONT_RESTAURANT_ID=42 STOREFRONT_TABLE_ID=T12 cargo run --example table_watch

use std::sync::Arc;
use storefront_client::{
    ClientConfig, HttpClient, SessionConfig, SessionEvent, TableContext, TableSession, WsConnector,
};
use storefront_core::money::format_amount;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let table = TableContext::from_env();
    if !table.is_seated() {
        println!("Set STOREFRONT_TABLE_ID to the table to watch");
        return Ok(());
    }

    let api = HttpClient::new(&ClientConfig::from_env())?;
    let session = TableSession::start(
        Arc::new(api),
        Arc::new(WsConnector::new()),
        table,
        SessionConfig::from_env(),
    )?;
    let mut events = session.subscribe();

    tracing::info!(
        table = session.table().display_name().unwrap_or_default(),
        "Watching table, Ctrl-C to stop"
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Ok(SessionEvent::OrdersRefreshed { count, active_total }) => {
                    tracing::info!(count, total = %format_amount(active_total), "Orders refreshed");
                }
                Ok(SessionEvent::OrderStatusChanged { order_id, from, to }) => {
                    tracing::info!(%order_id, %from, %to, "Order status changed");
                }
                Ok(SessionEvent::OrderVoided { order_id, reason }) => {
                    tracing::warn!(%order_id, reason = reason.as_deref().unwrap_or("-"), "Order voided");
                }
                Ok(other) => tracing::debug!(?other, "Session event"),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event stream lagged");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    session.shutdown();
    Ok(())
}
