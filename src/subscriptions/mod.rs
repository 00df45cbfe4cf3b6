//! Subscription system for store change notification.
//!
//! Invalidation is coarse: subscribers learn that *something* changed, never
//! what. They re-read the snapshots they care about.
//!
//! Two kinds of subscriber are supported:
//! - Callbacks, run synchronously on the mutating thread in registration
//!   order, before the mutation returns.
//! - Bounded channels, for consumers on other threads, with slow-subscriber
//!   dropping.
//!
//! # Example
//!
//! ```ignore
//! let store = Store::open(StoreConfig::default());
//!
//! let handle = store.subscribe(|| println!("store changed"));
//! store.add_customer(CustomerInput::default());
//! handle.unsubscribe();
//!
//! let events = store.subscribe_channel();
//! std::thread::spawn(move || {
//!     while let Ok(StoreEvent::Changed { revision }) = events.recv() {
//!         println!("now at revision {revision}");
//!     }
//! });
//! ```

mod manager;
mod types;

pub use manager::SubscriptionManager;
pub use types::{
    ChannelSubscription, DropReason, Listener, StoreEvent, SubscriptionHandle, SubscriptionId,
    DEFAULT_CHANNEL_BUFFER,
};
