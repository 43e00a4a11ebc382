//! Main HTTP Gateway Server.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use mealflow_orders::SessionOrders;
use mealflow_store::OrderStore;

use crate::webhook;

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    /// In-progress order drafts, one per conversation session.
    pub orders: SessionOrders,
    /// The external order store (persistence and pricing).
    pub store: Arc<dyn OrderStore>,
}

impl GatewayState {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self {
            orders: SessionOrders::new(),
            store,
        }
    }
}

/// Starts the Axum HTTP server for the fulfillment gateway.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let app = Router::new()
        .route("/", get(webhook::landing).post(webhook::handle_webhook))
        .route("/api/health", get(|| async { "OK" }))
        .with_state(state);

    info!("Gateway HTTP server listening on {}", addr);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
