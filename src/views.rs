//! Per-screen read handles.
//!
//! A [`CollectionView`] is what a list screen holds: it reads the latest
//! snapshot of one collection, knows whether the store changed since its last
//! read, and forwards edits to the store. It stays subscribed until dropped.

use crate::error::Result;
use crate::records::{Branch, Customer, Deletable, Employee, Entity, Invoice, Product, Receipt};
use crate::store::{Snapshot, Store};
use crate::subscriptions::SubscriptionHandle;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Live handle on one collection of a [`Store`].
pub struct CollectionView<'a, C: Entity> {
    store: &'a Store,
    stale: Arc<AtomicBool>,
    handle: SubscriptionHandle,
    _collection: PhantomData<fn() -> C>,
}

impl<'a, C: Entity> CollectionView<'a, C> {
    fn new(store: &'a Store, on_change: Option<Box<dyn Fn() + Send + Sync>>) -> Self {
        let stale = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stale);
        let handle = store.subscribe(move || {
            flag.store(true, Ordering::SeqCst);
            if let Some(callback) = &on_change {
                callback();
            }
        });
        Self {
            store,
            stale,
            handle,
            _collection: PhantomData,
        }
    }

    /// Latest snapshot. Same reference as the previous call unless the store
    /// changed in between.
    pub fn data(&self) -> Snapshot<C> {
        self.stale.store(false, Ordering::SeqCst);
        self.store.all::<C>()
    }

    /// True when a change was signalled since the last [`data`](Self::data).
    pub fn is_stale(&self) -> bool {
        self.stale.load(Ordering::SeqCst)
    }

    pub fn get(&self, id: &str) -> Option<C> {
        self.store.get::<C>(id)
    }

    pub fn add(&self, input: C::Input) -> C {
        self.store.add::<C>(input)
    }

    pub fn update(&self, id: &str, patch: C::Patch) -> Result<C> {
        self.store.update::<C>(id, patch)
    }

    /// Validate like the entry forms do, then add.
    pub fn submit(&self, input: C::Input) -> Result<C> {
        C::validate(&input)?;
        Ok(self.store.add::<C>(input))
    }
}

impl<C: Deletable> CollectionView<'_, C> {
    pub fn delete(&self, id: &str) -> Result<C> {
        self.store.delete::<C>(id)
    }
}

impl<C: Entity> Drop for CollectionView<'_, C> {
    fn drop(&mut self) {
        self.handle.unsubscribe();
    }
}

impl<C: Entity> fmt::Debug for CollectionView<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionView")
            .field("collection", &C::COLLECTION)
            .field("subscription", &self.handle.id)
            .field("stale", &self.is_stale())
            .finish()
    }
}

impl Store {
    /// Open a view on the collection of `C`.
    pub fn view<C: Entity>(&self) -> CollectionView<'_, C> {
        CollectionView::new(self, None)
    }

    /// Open a view that also runs `on_change` after every mutation, the way a
    /// screen schedules its re-render.
    pub fn view_with<C, F>(&self, on_change: F) -> CollectionView<'_, C>
    where
        C: Entity,
        F: Fn() + Send + Sync + 'static,
    {
        CollectionView::new(self, Some(Box::new(on_change)))
    }

    pub fn customers(&self) -> CollectionView<'_, Customer> {
        self.view()
    }

    pub fn products(&self) -> CollectionView<'_, Product> {
        self.view()
    }

    pub fn invoices(&self) -> CollectionView<'_, Invoice> {
        self.view()
    }

    pub fn employees(&self) -> CollectionView<'_, Employee> {
        self.view()
    }

    pub fn branches(&self) -> CollectionView<'_, Branch> {
        self.view()
    }

    pub fn receipts(&self) -> CollectionView<'_, Receipt> {
        self.view()
    }
}
