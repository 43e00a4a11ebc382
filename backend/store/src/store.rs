use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use anyhow::{Result, anyhow};
use async_trait::async_trait;

/// Abstract interface to the external order store.
///
/// One persisted order is an allocated id, one row per (item, quantity) line,
/// and a tracking-status row. Price aggregation joins the line rows against
/// the menu catalog.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Allocate the id for a new order (`MAX(order_id) + 1` semantics).
    async fn allocate_order_id(&self) -> Result<i64>;

    /// Insert one (item, quantity) line row for an order.
    async fn insert_order_item(&self, item: &str, quantity: i64, order_id: i64) -> Result<()>;

    /// Insert the tracking-status row for an order.
    async fn insert_tracking(&self, order_id: i64, status: &str) -> Result<()>;

    /// Aggregate price of an order: sum of quantity × menu unit price.
    async fn total_price(&self, order_id: i64) -> Result<f64>;

    /// Tracking status for an order id, or `None` if the id is unknown.
    async fn status(&self, order_id: i64) -> Result<Option<String>>;
}

/// Simple in-memory order store for tests and dev runs.
pub struct MemoryOrderStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    lines: HashMap<i64, Vec<(String, i64)>>,
    tracking: HashMap<i64, String>,
    menu: HashMap<String, f64>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
        }
    }

    /// Add a priced item to the menu catalog.
    pub fn add_menu_item(&self, name: &str, price: f64) {
        let mut inner = self.inner.write().unwrap();
        inner.menu.insert(name.to_string(), price);
    }

    /// Line rows persisted for an order, in insertion order.
    pub fn order_lines(&self, order_id: i64) -> Vec<(String, i64)> {
        let inner = self.inner.read().unwrap();
        inner.lines.get(&order_id).cloned().unwrap_or_default()
    }
}

impl Default for MemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn allocate_order_id(&self) -> Result<i64> {
        let inner = self.inner.read().unwrap();
        Ok(inner.lines.keys().copied().max().unwrap_or(0) + 1)
    }

    async fn insert_order_item(&self, item: &str, quantity: i64, order_id: i64) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        inner
            .lines
            .entry(order_id)
            .or_default()
            .push((item.to_string(), quantity));
        Ok(())
    }

    async fn insert_tracking(&self, order_id: i64, status: &str) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        inner.tracking.insert(order_id, status.to_string());
        Ok(())
    }

    async fn total_price(&self, order_id: i64) -> Result<f64> {
        let inner = self.inner.read().unwrap();
        let lines = inner
            .lines
            .get(&order_id)
            .ok_or_else(|| anyhow!("no such order: {order_id}"))?;
        Ok(lines
            .iter()
            .map(|(item, qty)| inner.menu.get(item).copied().unwrap_or(0.0) * *qty as f64)
            .sum())
    }

    async fn status(&self, order_id: i64) -> Result<Option<String>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.tracking.get(&order_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn allocates_sequential_ids() {
        let store = MemoryOrderStore::new();
        assert_eq!(store.allocate_order_id().await.unwrap(), 1);

        store.insert_order_item("samosa", 2, 1).await.unwrap();
        assert_eq!(store.allocate_order_id().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn totals_join_the_menu() {
        let store = MemoryOrderStore::new();
        store.add_menu_item("samosa", 3.0);
        store.add_menu_item("mango lassi", 4.5);

        store.insert_order_item("samosa", 2, 7).await.unwrap();
        store.insert_order_item("mango lassi", 1, 7).await.unwrap();

        assert_eq!(store.total_price(7).await.unwrap(), 10.5);
    }

    #[tokio::test]
    async fn tracking_status_roundtrip() {
        let store = MemoryOrderStore::new();
        store.insert_tracking(9, "in progress").await.unwrap();

        assert_eq!(store.status(9).await.unwrap().as_deref(), Some("in progress"));
        assert_eq!(store.status(10).await.unwrap(), None);
    }
}
