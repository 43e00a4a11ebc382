//! In-Progress Order Store.
//!
//! Tracks one draft order per conversation session and hands out per-session
//! guards so racing requests for the same session are serialized.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

pub type SessionToken = String;

/// Item name → quantity, in insertion order. Insertion order is part of the
/// contract: replies render the draft in the order items were first added.
pub type OrderDraft = IndexMap<String, i64>;

/// Outcome of removing a batch of items from a draft.
#[derive(Debug, Clone)]
pub struct RemoveOutcome {
    /// Items that were present and got deleted.
    pub removed: Vec<String>,
    /// Items that were requested but not in the draft.
    pub missing: Vec<String>,
    /// The draft as it stands after removal.
    pub remaining: OrderDraft,
}

/// Manages the in-progress order drafts of all live sessions.
#[derive(Clone, Default)]
pub struct SessionOrders {
    drafts: Arc<RwLock<HashMap<SessionToken, OrderDraft>>>,
    locks: Arc<Mutex<HashMap<SessionToken, Arc<Mutex<()>>>>>,
}

impl SessionOrders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the mutation guard for a session.
    ///
    /// Requests for the same session run one at a time while the guard is
    /// held; requests for different sessions do not contend.
    pub async fn guard(&self, session: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            Arc::clone(
                locks
                    .entry(session.to_string())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        lock.lock_owned().await
    }

    /// The current draft for a session, if one exists.
    pub async fn get(&self, session: &str) -> Option<OrderDraft> {
        let drafts = self.drafts.read().await;
        drafts.get(session).cloned()
    }

    /// Merge items into a session's draft, creating the draft if absent.
    ///
    /// Merging overwrites per key: a repeated item name replaces its prior
    /// quantity rather than adding to it. Returns the accumulated draft.
    pub async fn merge(
        &self,
        session: &str,
        items: impl IntoIterator<Item = (String, i64)>,
    ) -> OrderDraft {
        let mut drafts = self.drafts.write().await;
        let draft = drafts.entry(session.to_string()).or_default();
        for (item, quantity) in items {
            draft.insert(item, quantity);
        }
        draft.clone()
    }

    /// Delete the given items from a session's draft in place.
    ///
    /// Returns `None` if the session has no draft at all. An emptied draft
    /// stays in the store under its session token.
    pub async fn remove_items(&self, session: &str, items: &[String]) -> Option<RemoveOutcome> {
        let mut drafts = self.drafts.write().await;
        let draft = drafts.get_mut(session)?;

        let mut removed = Vec::new();
        let mut missing = Vec::new();
        for item in items {
            if draft.shift_remove(item).is_some() {
                removed.push(item.clone());
            } else {
                missing.push(item.clone());
            }
        }

        Some(RemoveOutcome {
            removed,
            missing,
            remaining: draft.clone(),
        })
    }

    /// Drop a session's draft entirely, returning it if it existed.
    pub async fn clear(&self, session: &str) -> Option<OrderDraft> {
        let mut drafts = self.drafts.write().await;
        drafts.remove(session)
    }
}
