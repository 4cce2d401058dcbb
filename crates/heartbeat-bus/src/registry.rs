//! # Subscription Registry
//!
//! Active subscriber queues by key. The wildcard list is kept apart from the
//! exact-key map so an event is never matched against `"*"` as a concrete key.

use crate::subscriber::SubscriptionId;
use heartbeat_types::{is_wildcard, HeartbeatEvent};
use std::collections::HashMap;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Writer side of one subscription.
///
/// The registry holds the only `Sender`; dropping the entry closes the queue.
#[derive(Debug)]
pub(crate) struct SubscriberEntry {
    pub(crate) id: SubscriptionId,
    pub(crate) sender: mpsc::Sender<Arc<HeartbeatEvent>>,
    /// Shared with the `Subscription` so the reader can see its own losses.
    pub(crate) dropped: Arc<AtomicU64>,
}

/// Subscriber queues registered under concrete keys and under the wildcard.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    exact: HashMap<String, Vec<SubscriberEntry>>,
    wildcard: Vec<SubscriberEntry>,
}

impl SubscriptionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register(&mut self, key: &str, entry: SubscriberEntry) {
        if is_wildcard(key) {
            self.wildcard.push(entry);
        } else {
            self.exact.entry(key.to_owned()).or_default().push(entry);
        }
    }

    /// Remove the entry with `id` under `key`. Unknown pairs yield `None`.
    pub(crate) fn remove(&mut self, key: &str, id: SubscriptionId) -> Option<SubscriberEntry> {
        if is_wildcard(key) {
            let index = self.wildcard.iter().position(|e| e.id == id)?;
            return Some(self.wildcard.remove(index));
        }

        let entries = self.exact.get_mut(key)?;
        let index = entries.iter().position(|e| e.id == id)?;
        let entry = entries.remove(index);
        if entries.is_empty() {
            self.exact.remove(key);
        }
        Some(entry)
    }

    /// Entries registered under the concrete `key`. Never the wildcard list.
    pub(crate) fn exact_mut(&mut self, key: &str) -> Option<&mut Vec<SubscriberEntry>> {
        if is_wildcard(key) {
            return None;
        }
        self.exact.get_mut(key)
    }

    pub(crate) fn wildcard_mut(&mut self) -> &mut Vec<SubscriberEntry> {
        &mut self.wildcard
    }

    /// Forget `key` if fan-out pruned its last entry.
    pub(crate) fn prune_key(&mut self, key: &str) {
        if self.exact.get(key).is_some_and(Vec::is_empty) {
            self.exact.remove(key);
        }
    }

    /// Active subscriptions under `key`; `"*"` counts wildcard subscriptions.
    #[must_use]
    pub fn count(&self, key: &str) -> usize {
        if is_wildcard(key) {
            self.wildcard.len()
        } else {
            self.exact.get(key).map_or(0, Vec::len)
        }
    }

    /// All active subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.wildcard.len() + self.exact.values().map(Vec::len).sum::<usize>()
    }

    /// True if nothing is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
