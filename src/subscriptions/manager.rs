//! Subscription manager for fanning out change notifications.

use crate::types::Revision;
use crossbeam_channel::{bounded, Sender};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{trace, warn};

use super::types::{
    ChannelSubscription, DropReason, Listener, StoreEvent, SubscriptionHandle, SubscriptionId,
};

/// Manages subscriptions and broadcasts change notifications.
///
/// Callback listeners run synchronously on the mutating thread, in
/// registration order. Channel subscribers get a [`StoreEvent`] per change.
pub struct SubscriptionManager {
    /// Callback listeners by ID. IDs grow monotonically, so iteration order
    /// is registration order.
    listeners: RwLock<BTreeMap<SubscriptionId, Listener>>,
    /// Channel subscribers by ID.
    channels: RwLock<BTreeMap<SubscriptionId, Sender<StoreEvent>>>,
    /// Counter for generating subscription IDs.
    next_id: AtomicU64,
}

impl SubscriptionManager {
    /// Create a new subscription manager.
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(BTreeMap::new()),
            channels: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn allocate_id(&self) -> SubscriptionId {
        SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Register a callback invoked after every mutation.
    pub fn subscribe<F>(self: &Arc<Self>, listener: F) -> SubscriptionHandle
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.allocate_id();
        self.listeners.write().insert(id, Arc::new(listener));
        SubscriptionHandle::new(id, Arc::downgrade(self))
    }

    /// Register a bounded channel that receives a [`StoreEvent`] per change.
    pub fn subscribe_channel(self: &Arc<Self>, buffer_size: usize) -> ChannelSubscription {
        let id = self.allocate_id();
        let (sender, receiver) = bounded(buffer_size);
        self.channels.write().insert(id, sender);
        ChannelSubscription::new(SubscriptionHandle::new(id, Arc::downgrade(self)), receiver)
    }

    /// Unsubscribe and clean up. Returns false if `id` was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        if self.listeners.write().remove(&id).is_some() {
            return true;
        }

        let removed = self.channels.write().remove(&id);
        match removed {
            Some(sender) => {
                // Best effort: the receiver may be full or gone.
                let _ = sender.try_send(StoreEvent::Dropped {
                    reason: DropReason::Unsubscribed,
                });
                true
            }
            None => false,
        }
    }

    pub fn is_registered(&self, id: SubscriptionId) -> bool {
        self.listeners.read().contains_key(&id) || self.channels.read().contains_key(&id)
    }

    /// Get subscription count (callbacks and channels).
    pub fn subscription_count(&self) -> usize {
        self.listeners.read().len() + self.channels.read().len()
    }

    /// Signal a change to every subscriber.
    ///
    /// No lock is held while callbacks run, so a callback may read the store,
    /// (un)subscribe, or mutate the store again; a nested mutation notifies
    /// recursively before this call returns. A listener removed by an earlier
    /// callback in the same round is skipped.
    ///
    /// Channel subscribers are sent this revision before any callback runs,
    /// so events from nested mutations queue up behind it.
    pub fn notify(&self, revision: Revision) {
        self.broadcast(StoreEvent::Changed { revision });

        let listeners: Vec<(SubscriptionId, Listener)> = self
            .listeners
            .read()
            .iter()
            .map(|(id, listener)| (*id, Arc::clone(listener)))
            .collect();

        trace!(%revision, listeners = listeners.len(), "notifying subscribers");

        for (id, listener) in listeners {
            let still_registered = self.listeners.read().contains_key(&id);
            if still_registered {
                listener();
            }
        }
    }

    /// Send to every channel subscriber. Drops subscribers that fail to receive.
    fn broadcast(&self, event: StoreEvent) {
        let mut to_remove = Vec::new();

        {
            let channels = self.channels.read();
            for (id, sender) in channels.iter() {
                match sender.try_send(event.clone()) {
                    Ok(()) => {}
                    Err(crossbeam_channel::TrySendError::Full(_)) => {
                        to_remove.push((*id, DropReason::BufferOverflow));
                    }
                    Err(crossbeam_channel::TrySendError::Disconnected(_)) => {
                        to_remove.push((*id, DropReason::Disconnected));
                    }
                }
            }
        }

        if !to_remove.is_empty() {
            let mut channels = self.channels.write();
            for (id, reason) in to_remove {
                if let Some(sender) = channels.remove(&id) {
                    warn!(subscription = id.0, ?reason, "dropping channel subscriber");
                    // Best effort, as in `unsubscribe`.
                    let _ = sender.try_send(StoreEvent::Dropped { reason });
                }
            }
        }
    }
}

impl Default for SubscriptionManager {
    fn default() -> Self {
        Self::new()
    }
}
