//! # Heartbeat Publisher
//!
//! The bus instance and its dispatcher.
//!
//! ## Lock Discipline
//!
//! Store and registry sit behind one `RwLock`. `publish`, `subscribe` and
//! `unsubscribe` take it exclusively; `recent`, `history`, `list_keys` share it.
//! Fan-out happens inside the same critical section as the append, so a queue
//! can never be closed while the dispatcher is writing to it. Every enqueue is
//! `try_send`, which keeps that critical section short and non-blocking.

use crate::config::{BusConfig, ConfigError};
use crate::registry::{SubscriberEntry, SubscriptionRegistry};
use crate::store::EventStore;
use crate::subscriber::{HeartbeatSubscriber, Subscription, SubscriptionId};
use heartbeat_types::{BusSnapshot, HeartbeatEvent};
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, trace};

/// Trait for reporting heartbeats to the bus.
///
/// Agents depend on this rather than on `HeartbeatBus` directly.
pub trait HeartbeatPublisher: Send + Sync {
    /// Report a heartbeat. Best-effort; never fails.
    fn report(&self, event: HeartbeatEvent);

    /// Get the total number of events published.
    fn events_published(&self) -> u64;
}

/// Outcome of fanning out one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Subscriber queues that accepted the event.
    pub delivered: usize,
    /// Subscriber queues that were full.
    pub dropped: usize,
}

/// State guarded by the bus lock.
#[derive(Debug)]
struct BusState {
    store: EventStore,
    registry: SubscriptionRegistry,
}

/// Shared core of a `HeartbeatBus`.
pub(crate) struct BusInner {
    config: BusConfig,
    state: RwLock<BusState>,

    /// Total events published.
    events_published: AtomicU64,

    /// Successful enqueues across all subscribers.
    deliveries: AtomicU64,

    /// Enqueues dropped on a full queue.
    drops: AtomicU64,
}

impl BusInner {
    /// Remove a subscription and close its queue.
    ///
    /// The entry is dropped, and its sender with it, before the write lock is
    /// released. Returns false if nothing matched.
    pub(crate) fn remove_subscription(&self, key: &str, id: SubscriptionId) -> bool {
        let mut state = self.state.write();
        let Some(entry) = state.registry.remove(key, id) else {
            return false;
        };
        drop(entry);
        drop(state);

        debug!(key, subscription = %id, "Subscription removed");
        true
    }
}

/// In-process heartbeat bus.
///
/// Cloning yields another handle to the same bus. There is no global
/// instance: whoever constructs the bus owns its lifetime, and subscriptions
/// only hold it weakly.
#[derive(Clone)]
pub struct HeartbeatBus {
    inner: Arc<BusInner>,
}

impl HeartbeatBus {
    /// Create a bus with the given capacities.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if either capacity is zero.
    pub fn new(config: BusConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Create a bus with default capacities (100 history, 10 queue).
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::build(BusConfig::default())
    }

    /// Capacities must already be validated.
    fn build(config: BusConfig) -> Self {
        Self {
            inner: Arc::new(BusInner {
                config,
                state: RwLock::new(BusState {
                    store: EventStore::new(config.history_capacity_per_key),
                    registry: SubscriptionRegistry::new(),
                }),
                events_published: AtomicU64::new(0),
                deliveries: AtomicU64::new(0),
                drops: AtomicU64::new(0),
            }),
        }
    }

    /// Capacities this bus was built with.
    #[must_use]
    pub fn config(&self) -> BusConfig {
        self.inner.config
    }

    /// Report a heartbeat, discarding the delivery outcome.
    pub fn report(&self, event: HeartbeatEvent) {
        self.publish(event);
    }

    /// Append `event` to its key's history and offer it to every matching queue.
    ///
    /// Subscribers under the exact key are offered the event first, then
    /// wildcard subscribers. A full queue drops the event for that subscriber
    /// only. Never blocks on a consumer.
    pub fn publish(&self, event: HeartbeatEvent) -> Delivery {
        let event = Arc::new(event);
        let key = event.agent_key.as_str();
        let mut delivery = Delivery::default();

        {
            let mut state = self.inner.state.write();
            let BusState { store, registry } = &mut *state;

            store.append(key, Arc::clone(&event));

            if let Some(entries) = registry.exact_mut(key) {
                offer(entries, &event, &mut delivery);
                registry.prune_key(key);
            }
            offer(registry.wildcard_mut(), &event, &mut delivery);
        }

        self.inner.events_published.fetch_add(1, Ordering::Relaxed);
        self.inner
            .deliveries
            .fetch_add(delivery.delivered as u64, Ordering::Relaxed);
        self.inner
            .drops
            .fetch_add(delivery.dropped as u64, Ordering::Relaxed);

        trace!(
            agent_key = key,
            status = %event.status,
            delivered = delivery.delivered,
            dropped = delivery.dropped,
            "Heartbeat published"
        );

        delivery
    }

    /// Subscribe to heartbeats for `key`, or for every agent with `"*"`.
    ///
    /// Each call creates an independent queue; two subscriptions to the same
    /// key each receive their own copy of every event.
    #[must_use]
    pub fn subscribe(&self, key: &str) -> Subscription {
        let (sender, receiver) = mpsc::channel(self.inner.config.subscriber_queue_capacity);
        let id = SubscriptionId::new();
        let dropped = Arc::new(AtomicU64::new(0));

        self.inner.state.write().registry.register(
            key,
            SubscriberEntry {
                id,
                sender,
                dropped: Arc::clone(&dropped),
            },
        );

        debug!(key, subscription = %id, "Subscription registered");

        Subscription::new(
            id,
            key.to_owned(),
            receiver,
            dropped,
            Arc::downgrade(&self.inner),
        )
    }

    /// Remove a subscription and close its queue.
    ///
    /// Unknown `(key, id)` pairs are ignored, so a racing double unsubscribe
    /// is harmless.
    pub fn unsubscribe(&self, key: &str, id: SubscriptionId) {
        self.inner.remove_subscription(key, id);
    }

    /// Up to `count` most recent events for `key`, oldest first.
    #[must_use]
    pub fn recent(&self, key: &str, count: usize) -> Vec<Arc<HeartbeatEvent>> {
        self.inner.state.read().store.recent(key, count)
    }

    /// Whole retained history for `key`, oldest first.
    #[must_use]
    pub fn history(&self, key: &str) -> Vec<Arc<HeartbeatEvent>> {
        self.inner.state.read().store.history(key)
    }

    /// Most recent event for `key`.
    #[must_use]
    pub fn latest(&self, key: &str) -> Option<Arc<HeartbeatEvent>> {
        self.inner.state.read().store.latest(key)
    }

    /// Keys with at least one recorded event.
    #[must_use]
    pub fn list_keys(&self) -> BTreeSet<String> {
        self.inner.state.read().store.keys()
    }

    /// Active subscriptions under `key`; `"*"` counts wildcard subscriptions.
    #[must_use]
    pub fn subscriber_count(&self, key: &str) -> usize {
        self.inner.state.read().registry.count(key)
    }

    /// Sizes and counters at this instant.
    #[must_use]
    pub fn snapshot(&self) -> BusSnapshot {
        let state = self.inner.state.read();
        BusSnapshot {
            keys: state.store.key_count(),
            buffered_events: state.store.total_events(),
            active_subscriptions: state.registry.len(),
            events_published: self.inner.events_published.load(Ordering::Relaxed),
            deliveries: self.inner.deliveries.load(Ordering::Relaxed),
            drops: self.inner.drops.load(Ordering::Relaxed),
        }
    }
}

impl Default for HeartbeatBus {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for HeartbeatBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.read();
        f.debug_struct("HeartbeatBus")
            .field("config", &self.inner.config)
            .field("keys", &state.store.key_count())
            .field("subscriptions", &state.registry.len())
            .finish()
    }
}

impl HeartbeatPublisher for HeartbeatBus {
    fn report(&self, event: HeartbeatEvent) {
        HeartbeatBus::report(self, event);
    }

    fn events_published(&self) -> u64 {
        self.inner.events_published.load(Ordering::Relaxed)
    }
}

impl HeartbeatSubscriber for HeartbeatBus {
    fn subscribe(&self, key: &str) -> Subscription {
        HeartbeatBus::subscribe(self, key)
    }

    fn unsubscribe(&self, key: &str, id: SubscriptionId) {
        HeartbeatBus::unsubscribe(self, key, id);
    }
}

/// Try-enqueue `event` onto each entry, pruning entries whose reader is gone.
///
/// A `Subscription` unsubscribes before releasing its receiver, so `Closed`
/// only shows up for an entry whose reader was dropped some other way. Such an
/// entry is removed here instead of lingering until the key is unsubscribed.
fn offer(entries: &mut Vec<SubscriberEntry>, event: &Arc<HeartbeatEvent>, delivery: &mut Delivery) {
    entries.retain(|entry| match entry.sender.try_send(Arc::clone(event)) {
        Ok(()) => {
            delivery.delivered += 1;
            true
        }
        Err(TrySendError::Full(_)) => {
            entry.dropped.fetch_add(1, Ordering::Relaxed);
            delivery.dropped += 1;
            trace!(
                agent_key = %event.agent_key,
                subscription = %entry.id,
                "Subscriber queue full, heartbeat dropped"
            );
            true
        }
        Err(TrySendError::Closed(_)) => {
            debug!(subscription = %entry.id, "Pruning subscription with closed queue");
            false
        }
    });
}
