//! # Heartbeat Subscriber
//!
//! The reading side of the bus. A `Subscription` owns the receiver of one
//! bounded queue; the bus owns the only sender.

use crate::publisher::BusInner;
use heartbeat_types::{is_wildcard, HeartbeatEvent};
use std::fmt;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_stream::Stream;
use uuid::Uuid;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The subscription was removed from the bus, or the bus is gone.
    #[error("Subscription closed")]
    Closed,
}

/// Identity of one subscription, used to unsubscribe it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Trait for registering interest in heartbeats.
pub trait HeartbeatSubscriber: Send + Sync {
    /// Subscribe to `key`, or to every agent with `"*"`.
    fn subscribe(&self, key: &str) -> Subscription;

    /// Remove a subscription. Unknown pairs are ignored.
    fn unsubscribe(&self, key: &str, id: SubscriptionId);
}

/// A subscription handle for receiving heartbeats.
///
/// When dropped, the subscription is removed from the bus.
pub struct Subscription {
    id: SubscriptionId,
    key: String,
    receiver: mpsc::Receiver<Arc<HeartbeatEvent>>,
    dropped: Arc<AtomicU64>,
    /// Weak so a forgotten handle never keeps the bus alive.
    bus: Weak<BusInner>,
}

impl Subscription {
    pub(crate) fn new(
        id: SubscriptionId,
        key: String,
        receiver: mpsc::Receiver<Arc<HeartbeatEvent>>,
        dropped: Arc<AtomicU64>,
        bus: Weak<BusInner>,
    ) -> Self {
        Self {
            id,
            key,
            receiver,
            dropped,
            bus,
        }
    }

    /// Identity to pass to `unsubscribe`.
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Key this subscription was registered under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// True for `"*"` subscriptions.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        is_wildcard(&self.key)
    }

    /// Events the dispatcher gave up on because this queue was full.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Receive the next event.
    ///
    /// # Returns
    ///
    /// - `Some(event)` - The next queued event
    /// - `None` - Unsubscribed and drained; no more events will arrive
    ///
    /// There is no timeout; wrap in `tokio::time::timeout` for a bounded wait.
    pub async fn recv(&mut self) -> Option<Arc<HeartbeatEvent>> {
        self.receiver.recv().await
    }

    /// Try to receive the next event without blocking.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(event))` - An event was queued
    /// - `Ok(None)` - Queue is empty for now
    /// - `Err(SubscriptionError::Closed)` - Unsubscribed and drained
    pub fn try_recv(&mut self) -> Result<Option<Arc<HeartbeatEvent>>, SubscriptionError> {
        match self.receiver.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::error::TryRecvError::Empty) => Ok(None),
            Err(mpsc::error::TryRecvError::Disconnected) => Err(SubscriptionError::Closed),
        }
    }

    /// Blocking receive for readers on plain threads.
    ///
    /// # Panics
    ///
    /// Panics if called from within an async runtime.
    pub fn blocking_recv(&mut self) -> Option<Arc<HeartbeatEvent>> {
        self.receiver.blocking_recv()
    }

    /// Turn this subscription into a `Stream`.
    #[must_use]
    pub fn into_stream(self) -> EventStream {
        EventStream::new(self)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("dropped", &self.dropped())
            .finish_non_exhaustive()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(bus) = self.bus.upgrade() else {
            return;
        };
        bus.remove_subscription(&self.key, self.id);
    }
}

/// A stream wrapper for subscriptions.
///
/// Implements `tokio_stream::Stream`; ends when the subscription is closed.
#[derive(Debug)]
pub struct EventStream {
    subscription: Subscription,
}

impl EventStream {
    /// Create a new event stream from a subscription.
    #[must_use]
    pub fn new(subscription: Subscription) -> Self {
        Self { subscription }
    }

    /// The underlying subscription.
    #[must_use]
    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }
}

impl Stream for EventStream {
    type Item = Arc<HeartbeatEvent>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().subscription.receiver.poll_recv(cx)
    }
}
