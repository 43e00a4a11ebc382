/// SQLite-backed order store.
///
/// Uses `rusqlite` to persist order line rows, tracking-status rows, and the
/// priced menu catalog. Order ids follow `MAX(order_id) + 1` so ids stay
/// small and human-quotable over the phone.
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, params};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::store::OrderStore;

/// Dishes seeded into an empty catalog so price aggregation works out of the
/// box. `INSERT OR IGNORE` keeps operator edits across restarts.
const DEFAULT_MENU: &[(&str, f64)] = &[
    ("pav bhaji", 6.0),
    ("chole bhature", 7.0),
    ("pizza", 8.5),
    ("mango lassi", 4.5),
    ("masala dosa", 6.5),
    ("biryani", 9.0),
    ("vada pav", 3.0),
    ("rava dosa", 6.0),
    ("samosa", 3.0),
];

pub struct SqliteOrderStore {
    conn: Mutex<Connection>,
}

impl SqliteOrderStore {
    /// Create or open a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .context("Failed to open SQLite order database")?;

        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             CREATE TABLE IF NOT EXISTS food_items (
                 item_id  INTEGER PRIMARY KEY AUTOINCREMENT,
                 name     TEXT NOT NULL UNIQUE,
                 price    REAL NOT NULL
             );
             CREATE TABLE IF NOT EXISTS orders (
                 order_id   INTEGER NOT NULL,
                 item       TEXT NOT NULL,
                 quantity   INTEGER NOT NULL,
                 created_at TEXT NOT NULL
             );
             CREATE INDEX IF NOT EXISTS idx_orders_order_id ON orders(order_id);
             CREATE TABLE IF NOT EXISTS order_tracking (
                 order_id INTEGER PRIMARY KEY,
                 status   TEXT NOT NULL
             );",
        )
        .context("Failed to initialize order schema")?;

        info!("SqliteOrderStore opened at {:?}", path.as_ref());
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Open an in-memory database (for tests).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS food_items (
                 item_id  INTEGER PRIMARY KEY AUTOINCREMENT,
                 name     TEXT NOT NULL UNIQUE,
                 price    REAL NOT NULL
             );
             CREATE TABLE IF NOT EXISTS orders (
                 order_id   INTEGER NOT NULL,
                 item       TEXT NOT NULL,
                 quantity   INTEGER NOT NULL,
                 created_at TEXT NOT NULL
             );
             CREATE TABLE IF NOT EXISTS order_tracking (
                 order_id INTEGER PRIMARY KEY,
                 status   TEXT NOT NULL
             );",
        )?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Seed the default menu into the catalog.
    pub async fn seed_default_menu(&self) -> Result<()> {
        let conn = self.conn.lock().await;
        for (name, price) in DEFAULT_MENU {
            conn.execute(
                "INSERT OR IGNORE INTO food_items (name, price) VALUES (?1, ?2)",
                params![name, price],
            )?;
        }
        debug!(items = DEFAULT_MENU.len(), "Menu catalog seeded");
        Ok(())
    }

    /// Add or reprice a single menu item.
    pub async fn upsert_menu_item(&self, name: &str, price: f64) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO food_items (name, price) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET price = excluded.price",
            params![name, price],
        )?;
        Ok(())
    }
}

#[async_trait]
impl OrderStore for SqliteOrderStore {
    async fn allocate_order_id(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        let next: i64 = conn.query_row(
            "SELECT COALESCE(MAX(order_id), 0) + 1 FROM orders",
            [],
            |row| row.get(0),
        )?;
        Ok(next)
    }

    async fn insert_order_item(&self, item: &str, quantity: i64, order_id: i64) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO orders (order_id, item, quantity, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![order_id, item, quantity, chrono::Utc::now().to_rfc3339()],
        )?;
        debug!(order_id, item, quantity, "Order line inserted");
        Ok(())
    }

    async fn insert_tracking(&self, order_id: i64, status: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT OR REPLACE INTO order_tracking (order_id, status) VALUES (?1, ?2)",
            params![order_id, status],
        )?;
        Ok(())
    }

    async fn total_price(&self, order_id: i64) -> Result<f64> {
        let conn = self.conn.lock().await;
        let total: f64 = conn.query_row(
            "SELECT COALESCE(SUM(o.quantity * f.price), 0.0)
             FROM orders o
             JOIN food_items f ON f.name = o.item
             WHERE o.order_id = ?1",
            params![order_id],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    async fn status(&self, order_id: i64) -> Result<Option<String>> {
        let conn = self.conn.lock().await;
        let status = conn
            .query_row(
                "SELECT status FROM order_tracking WHERE order_id = ?1",
                params![order_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(status)
    }
}
