//! Subscription types for store change notification.

use crate::types::Revision;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Weak};

use super::manager::SubscriptionManager;

/// Callback invoked after every mutation. Carries no payload: listeners
/// re-read whatever snapshot they need.
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// Default buffer size for channel subscriptions.
pub const DEFAULT_CHANNEL_BUFFER: usize = 1000;

/// Events delivered to channel subscribers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    /// Something changed. `revision` is the store revision after the change.
    Changed { revision: Revision },

    /// Subscription was dropped.
    Dropped { reason: DropReason },
}

/// Why a subscription was dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Send buffer overflowed (slow consumer).
    BufferOverflow,
    /// Receiver went away.
    Disconnected,
    /// Explicitly unsubscribed.
    Unsubscribed,
}

/// Unique identifier for a subscription. Assigned in registration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(pub u64);

/// Handle returned by `subscribe`.
///
/// Dropping the handle does not unsubscribe; call [`unsubscribe`](Self::unsubscribe).
#[derive(Clone, Debug)]
pub struct SubscriptionHandle {
    pub id: SubscriptionId,
    manager: Weak<SubscriptionManager>,
}

impl SubscriptionHandle {
    pub(crate) fn new(id: SubscriptionId, manager: Weak<SubscriptionManager>) -> Self {
        Self { id, manager }
    }

    /// Remove the subscription. Returns false if it was already gone, so
    /// calling this twice is harmless.
    pub fn unsubscribe(&self) -> bool {
        match self.manager.upgrade() {
            Some(manager) => manager.unsubscribe(self.id),
            None => false,
        }
    }

    /// Whether the subscription is still registered.
    pub fn is_active(&self) -> bool {
        self.manager
            .upgrade()
            .map_or(false, |manager| manager.is_registered(self.id))
    }
}

/// Channel-backed subscription for consumers on other threads.
pub struct ChannelSubscription {
    handle: SubscriptionHandle,
    /// Channel to receive events.
    pub receiver: crossbeam_channel::Receiver<StoreEvent>,
}

impl ChannelSubscription {
    pub(crate) fn new(
        handle: SubscriptionHandle,
        receiver: crossbeam_channel::Receiver<StoreEvent>,
    ) -> Self {
        Self { handle, receiver }
    }

    pub fn id(&self) -> SubscriptionId {
        self.handle.id
    }

    pub fn unsubscribe(&self) -> bool {
        self.handle.unsubscribe()
    }

    /// Receive the next event (blocking).
    pub fn recv(&self) -> Result<StoreEvent, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<StoreEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<StoreEvent, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Everything currently buffered, without blocking.
    pub fn drain(&self) -> Vec<StoreEvent> {
        self.receiver.try_iter().collect()
    }
}
