//! Fulfillment webhook endpoint (`POST /`).
//!
//! The upstream platform posts the classified intent, the extracted
//! parameters, and the active output contexts; the reply is a single
//! `fulfillmentText` string. Conversational outcomes always return 200 —
//! the platform only reads the text. Unroutable intents map to 400 and
//! undefined faults to 500.

use anyhow::Context;
use axum::{extract::State, http::StatusCode, response::Html, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use mealflow_core::FulfillError;
use mealflow_orders::handlers::{
    self, AddItemsParams, RemoveItemsParams, TrackOrderParams,
};
use mealflow_routing::{Intent, extract_session_id};

use crate::server::GatewayState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    pub query_result: QueryResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub intent: IntentRef,
    #[serde(default)]
    pub parameters: serde_json::Value,
    #[serde(default)]
    pub output_contexts: Vec<OutputContext>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRef {
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct OutputContext {
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentResponse {
    pub fulfillment_text: String,
}

/// Handler for `POST /`.
pub async fn handle_webhook(
    State(state): State<GatewayState>,
    Json(payload): Json<WebhookRequest>,
) -> Result<Json<FulfillmentResponse>, StatusCode> {
    let session = payload
        .query_result
        .output_contexts
        .first()
        .map(|ctx| extract_session_id(&ctx.name))
        .unwrap_or_default();

    match dispatch(&state, &session, &payload.query_result).await {
        Ok(text) => Ok(Json(FulfillmentResponse {
            fulfillment_text: text,
        })),
        Err(FulfillError::UnknownIntent(name)) => {
            warn!(intent = %name, session = %session, "Unroutable intent");
            Err(StatusCode::BAD_REQUEST)
        }
        Err(e) => {
            error!(error = %e, session = %session, "Webhook handling failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Resolve the intent and run its handler under the session's guard.
pub async fn dispatch(
    state: &GatewayState,
    session: &str,
    query: &QueryResult,
) -> Result<String, FulfillError> {
    let intent = Intent::parse(&query.intent.display_name)?;

    // Serialize racing requests for the same session; track-order is a pure
    // store read and takes no guard.
    let text = match intent {
        Intent::AddToOrder => {
            let params: AddItemsParams = serde_json::from_value(query.parameters.clone())
                .context("malformed add-to-order parameters")?;
            let _guard = state.orders.guard(session).await;
            handlers::add_to_order(&state.orders, session, params).await
        }
        Intent::RemoveFromOrder => {
            let params: RemoveItemsParams = serde_json::from_value(query.parameters.clone())
                .context("malformed remove-from-order parameters")?;
            let _guard = state.orders.guard(session).await;
            handlers::remove_from_order(&state.orders, session, params).await
        }
        Intent::CompleteOrder => {
            let _guard = state.orders.guard(session).await;
            handlers::complete_order(&state.orders, state.store.as_ref(), session).await?
        }
        Intent::TrackOrder => {
            let params: TrackOrderParams = serde_json::from_value(query.parameters.clone())
                .context("malformed track-order parameters")?;
            handlers::track_order(state.store.as_ref(), params).await?
        }
    };
    Ok(text)
}

const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Mealflow</title></head>
<body>
<h1>Mealflow</h1>
<p>Fulfillment backend for the food-ordering assistant. POST webhook payloads to this endpoint.</p>
</body>
</html>
"#;

/// Handler for `GET /`.
pub async fn landing() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use mealflow_store::{MemoryOrderStore, OrderStore};
    use serde_json::json;

    fn payload(intent: &str, parameters: serde_json::Value) -> WebhookRequest {
        serde_json::from_value(json!({
            "queryResult": {
                "intent": {"displayName": intent},
                "parameters": parameters,
                "outputContexts": [{
                    "name": "projects/mealflow-demo/agent/sessions/ABC123/contexts/ongoing-order"
                }]
            }
        }))
        .unwrap()
    }

    fn state_with(store: MemoryOrderStore) -> GatewayState {
        GatewayState::new(Arc::new(store))
    }

    #[test]
    fn deserializes_upstream_payload_shape() {
        let request = payload(
            "order.add - context: ongoing-order",
            json!({"food-item": ["pizza"], "number": [2.0]}),
        );
        assert_eq!(
            request.query_result.intent.display_name,
            "order.add - context: ongoing-order"
        );
        assert_eq!(request.query_result.output_contexts.len(), 1);
    }

    #[tokio::test]
    async fn add_flow_replies_with_accumulated_order() {
        let state = state_with(MemoryOrderStore::new());
        let request = payload(
            "order.add - context: ongoing-order",
            json!({"food-item": ["pizza", "coke"], "number": [2.0, 1.0]}),
        );

        let response = handle_webhook(State(state.clone()), Json(request))
            .await
            .unwrap();
        assert_eq!(
            response.0.fulfillment_text,
            "So far, you have: 2pizza, 1coke. Do you want anything else?"
        );
        assert!(state.orders.get("ABC123").await.is_some());
    }

    #[tokio::test]
    async fn unknown_intent_maps_to_bad_request() {
        let state = state_with(MemoryOrderStore::new());
        let request = payload("order.cancel - context: ongoing-order", json!({}));

        let status = handle_webhook(State(state), Json(request)).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_parameters_map_to_internal_error() {
        let state = state_with(MemoryOrderStore::new());
        let request = payload(
            "order.add - context: ongoing-order",
            json!({"number": [2.0]}),
        );

        let status = handle_webhook(State(state), Json(request)).await.unwrap_err();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn missing_output_context_falls_back_to_empty_session() {
        let state = state_with(MemoryOrderStore::new());
        let request: WebhookRequest = serde_json::from_value(json!({
            "queryResult": {
                "intent": {"displayName": "order.add - context: ongoing-order"},
                "parameters": {"food-item": ["pizza"], "number": [1.0]},
                "outputContexts": []
            }
        }))
        .unwrap();

        handle_webhook(State(state.clone()), Json(request)).await.unwrap();
        // The degenerate empty token participates like any other session.
        assert!(state.orders.get("").await.is_some());
    }

    #[tokio::test]
    async fn concurrent_completes_check_out_exactly_once() {
        let store = MemoryOrderStore::new();
        store.add_menu_item("pizza", 8.5);
        let state = state_with(store);

        let add = payload(
            "order.add - context: ongoing-order",
            json!({"food-item": ["pizza"], "number": [2.0]}),
        );
        handle_webhook(State(state.clone()), Json(add)).await.unwrap();

        let complete = || {
            let state = state.clone();
            async move {
                let request = payload("order.complete - context:ongoing-order", json!({}));
                dispatch(&state, "ABC123", &request.query_result).await.unwrap()
            }
        };

        let (first, second) = tokio::join!(complete(), complete());
        let successes = [&first, &second]
            .iter()
            .filter(|reply| reply.starts_with("Awesome!"))
            .count();
        assert_eq!(successes, 1);
    }

    #[tokio::test]
    async fn track_flow_reads_the_store() {
        let store = MemoryOrderStore::new();
        store.insert_tracking(41, "in progress").await.unwrap();
        let state = state_with(store);

        let request = payload(
            "track.order - context: ongoing-tracking",
            json!({"number": 41.0}),
        );
        let response = handle_webhook(State(state), Json(request)).await.unwrap();
        assert_eq!(
            response.0.fulfillment_text,
            "The order status for order id: 41 is: in progress"
        );
    }
}
