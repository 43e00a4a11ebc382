//! The four fulfillment handlers.
//!
//! Each handler turns one classified intent into a single reply string,
//! mutating the session's draft and/or calling the order store along the way.
//! Conversational dead ends (mismatched quantities, no draft to act on, a
//! failed line insert) are replies, not errors; only undefined store faults
//! propagate.

use anyhow::Result;
use serde::Deserialize;
use tracing::warn;

use mealflow_store::OrderStore;

use crate::format::format_order;
use crate::session_store::{OrderDraft, SessionOrders};

/// Parameters for `order.add`: item names zipped pairwise with quantities.
/// Quantities arrive as floats and are truncated at ingestion.
#[derive(Debug, Deserialize)]
pub struct AddItemsParams {
    #[serde(rename = "food-item")]
    pub food_items: Vec<String>,
    #[serde(rename = "number", default)]
    pub quantities: Vec<f64>,
}

/// Parameters for `order.remove`.
#[derive(Debug, Deserialize)]
pub struct RemoveItemsParams {
    #[serde(rename = "food-item")]
    pub food_items: Vec<String>,
}

/// Parameters for `track.order`.
#[derive(Debug, Deserialize)]
pub struct TrackOrderParams {
    #[serde(rename = "number")]
    pub order_id: f64,
}

/// Merge new items into the session's draft and echo the accumulated order.
pub async fn add_to_order(
    orders: &SessionOrders,
    session: &str,
    params: AddItemsParams,
) -> String {
    if params.food_items.len() != params.quantities.len() {
        return "Sorry, please specify the quantities of each food item.".to_string();
    }

    let items = params
        .food_items
        .into_iter()
        .zip(params.quantities.into_iter().map(|q| q.trunc() as i64));
    let accumulated = orders.merge(session, items).await;

    format!(
        "So far, you have: {}. Do you want anything else?",
        format_order(&accumulated)
    )
}

/// Delete the requested items from the session's draft and report what
/// happened to each.
pub async fn remove_from_order(
    orders: &SessionOrders,
    session: &str,
    params: RemoveItemsParams,
) -> String {
    let Some(outcome) = orders.remove_items(session, &params.food_items).await else {
        return "I'm having a trouble finding your order. Sorry! Can you place a new order please?"
            .to_string();
    };

    let mut segments = Vec::new();
    if !outcome.removed.is_empty() {
        segments.push(format!(
            "Removed {} from your order!",
            outcome.removed.join(", ")
        ));
    }
    if !outcome.missing.is_empty() {
        segments.push(format!(
            "Your current order does not have {}.",
            outcome.missing.join(", ")
        ));
    }
    if outcome.remaining.is_empty() {
        segments.push("Your order is empty!".to_string());
    } else {
        segments.push(format!(
            "Here is what is left in your order: {}",
            format_order(&outcome.remaining)
        ));
    }
    segments.join(" ")
}

/// Reconcile the session's draft into the order store and quote id + total.
///
/// The draft is discarded whether checkout succeeded or not — a failed line
/// insert has no retry path and the caller starts a fresh order. Faults
/// outside the line-insert loop propagate without touching the draft.
pub async fn complete_order(
    orders: &SessionOrders,
    store: &dyn OrderStore,
    session: &str,
) -> Result<String> {
    let Some(draft) = orders.get(session).await else {
        return Ok(
            "I am having a trouble finding your order. Please place a new order".to_string(),
        );
    };

    let text = match checkout(store, &draft).await? {
        Some((order_id, total)) => format!(
            "Awesome! Your order id is {order_id} and your order total is {total}. \
             You can pay at the time of delivery."
        ),
        None => "Sorry, I could not process your order due to a backend error. Please try again"
            .to_string(),
    };

    orders.clear(session).await;
    Ok(text)
}

/// Persist a draft: allocate an id, insert one line per item, then the
/// tracking row. Returns `None` if a line insert failed; the allocated id is
/// left dangling.
async fn checkout(store: &dyn OrderStore, draft: &OrderDraft) -> Result<Option<(i64, f64)>> {
    let order_id = store.allocate_order_id().await?;

    for (item, quantity) in draft {
        if let Err(error) = store.insert_order_item(item, *quantity, order_id).await {
            warn!(order_id, item = %item, error = %error, "Order line insert failed; abandoning checkout");
            return Ok(None);
        }
    }

    store.insert_tracking(order_id, "in progress").await?;
    let total = store.total_price(order_id).await?;
    Ok(Some((order_id, total)))
}

/// Look up the tracking status for an order id.
pub async fn track_order(store: &dyn OrderStore, params: TrackOrderParams) -> Result<String> {
    let order_id = params.order_id.trunc() as i64;
    let text = match store.status(order_id).await? {
        Some(status) => format!("The order status for order id: {order_id} is: {status}"),
        None => format!("No order found with order id: {order_id}"),
    };
    Ok(text)
}
