//! Mealflow Gateway HTTP Server
//!
//! Receives fulfillment webhooks from the upstream conversational platform
//! and serves the landing page and health endpoint.

pub mod server;
pub mod webhook;

pub use server::{GatewayState, start_server};
