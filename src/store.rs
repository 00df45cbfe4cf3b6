//! Main Store struct tying all components together.

use crate::error::{Result, StoreError};
use crate::ids::{IdAllocator, IdStrategy};
use crate::records::{
    sum_amounts, Branch, BranchInput, BranchPatch, Customer, CustomerInput, CustomerPatch,
    Deletable, Employee, EmployeeInput, EmployeePatch, Entity, Invoice, InvoiceInput,
    InvoicePatch, InvoiceSummary, Product, ProductInput, ProductPatch, Receipt, ReceiptInput,
    ReceiptPatch,
};
use crate::seed::Seed;
use crate::subscriptions::{
    ChannelSubscription, SubscriptionHandle, SubscriptionManager, DEFAULT_CHANNEL_BUFFER,
};
use crate::types::{Revision, StoreStats};
use parking_lot::{ReentrantMutex, RwLock, RwLockWriteGuard};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Store configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// How identifiers of new records are derived.
    pub id_strategy: IdStrategy,

    /// Load the sample records in [`Store::open`].
    pub seed: bool,

    /// Buffer size of channel subscriptions opened with
    /// [`Store::subscribe_channel`].
    pub channel_buffer_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            id_strategy: IdStrategy::Monotonic,
            seed: true,
            channel_buffer_size: DEFAULT_CHANNEL_BUFFER,
        }
    }
}

impl StoreConfig {
    /// Parse a JSON configuration. Missing fields take their defaults.
    ///
    /// Malformed JSON and unknown fields are [`StoreError::Serialization`];
    /// out-of-range values are [`StoreError::Config`].
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: StoreConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.channel_buffer_size == 0 {
            return Err(StoreError::Config(
                "channel_buffer_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Immutable point-in-time copy of a collection.
///
/// Cloning is cheap. The outer array is rebuilt on every mutation while the
/// records themselves are shared, so two snapshots are the same reference
/// ([`Snapshot::ptr_eq`]) iff no mutation happened between the two reads.
pub struct Snapshot<C>(Arc<[Arc<C>]>);

type SnapshotIter<'a, C> = std::iter::Map<std::slice::Iter<'a, Arc<C>>, fn(&Arc<C>) -> &C>;

fn unwrap_arc<C>(record: &Arc<C>) -> &C {
    record
}

impl<C> Snapshot<C> {
    fn from_rows(rows: &[Arc<C>]) -> Self {
        Snapshot(rows.iter().cloned().collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&C> {
        self.0.get(index).map(|record| record.as_ref())
    }

    pub fn first(&self) -> Option<&C> {
        self.get(0)
    }

    pub fn last(&self) -> Option<&C> {
        self.0.last().map(|record| record.as_ref())
    }

    pub fn iter(&self) -> SnapshotIter<'_, C> {
        self.0.iter().map(unwrap_arc as fn(&Arc<C>) -> &C)
    }

    /// True when both snapshots are the very same reference.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<C: Clone> Snapshot<C> {
    pub fn to_vec(&self) -> Vec<C> {
        self.iter().cloned().collect()
    }
}

impl<C: Entity> Snapshot<C> {
    /// Record with the given id, if present.
    pub fn find(&self, id: &str) -> Option<&C> {
        self.iter().find(|record| record.id() == id)
    }
}

impl<C> Clone for Snapshot<C> {
    fn clone(&self) -> Self {
        Snapshot(Arc::clone(&self.0))
    }
}

impl<C: fmt::Debug> fmt::Debug for Snapshot<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, C> IntoIterator for &'a Snapshot<C> {
    type Item = &'a C;
    type IntoIter = SnapshotIter<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Backing storage of one collection.
pub struct Table<C> {
    rows: Vec<Arc<C>>,
    snapshot: Snapshot<C>,
    ids: IdAllocator,
}

impl<C: Entity> Table<C> {
    fn load(rows: Vec<C>, strategy: IdStrategy) -> Self {
        let mut ids = IdAllocator::new(C::COLLECTION, strategy);
        for row in &rows {
            ids.observe(row.id());
        }
        let rows: Vec<Arc<C>> = rows.into_iter().map(Arc::new).collect();
        let snapshot = Snapshot::from_rows(&rows);
        Self {
            rows,
            snapshot,
            ids,
        }
    }

    fn insert(&mut self, input: C::Input) -> C {
        let id = self.ids.allocate(self.rows.len());
        let record = C::from_input(id, input);
        self.rows.push(Arc::new(record.clone()));
        record
    }

    fn update(&mut self, id: &str, patch: C::Patch) -> Option<C> {
        let slot = self.rows.iter_mut().find(|row| row.id() == id)?;
        // Copy-on-write: snapshots holding the old record keep seeing it.
        let record = Arc::make_mut(slot);
        record.apply_patch(patch);
        Some(record.clone())
    }

    fn remove(&mut self, id: &str) -> Option<C> {
        let index = self.rows.iter().position(|row| row.id() == id)?;
        let removed = self.rows.remove(index);
        Some(Arc::try_unwrap(removed).unwrap_or_else(|shared| C::clone(&shared)))
    }

    fn find(&self, id: &str) -> Option<&C> {
        self.rows
            .iter()
            .find(|row| row.id() == id)
            .map(|row| row.as_ref())
    }

    fn rebuild_snapshot(&mut self) {
        self.snapshot = Snapshot::from_rows(&self.rows);
    }
}

/// All six collections plus the revision counter.
pub struct Tables {
    pub(crate) customers: Table<Customer>,
    pub(crate) products: Table<Product>,
    pub(crate) invoices: Table<Invoice>,
    pub(crate) employees: Table<Employee>,
    pub(crate) branches: Table<Branch>,
    pub(crate) receipts: Table<Receipt>,
    revision: Revision,
}

impl Tables {
    fn load(seed: Seed, strategy: IdStrategy) -> Self {
        Self {
            customers: Table::load(seed.customers, strategy),
            products: Table::load(seed.products, strategy),
            invoices: Table::load(seed.invoices, strategy),
            employees: Table::load(seed.employees, strategy),
            branches: Table::load(seed.branches, strategy),
            receipts: Table::load(seed.receipts, strategy),
            revision: Revision::default(),
        }
    }

    /// Rebuild every snapshot and bump the revision.
    fn commit(&mut self) -> Revision {
        self.customers.rebuild_snapshot();
        self.products.rebuild_snapshot();
        self.invoices.rebuild_snapshot();
        self.employees.rebuild_snapshot();
        self.branches.rebuild_snapshot();
        self.receipts.rebuild_snapshot();
        self.revision = self.revision.next();
        self.revision
    }
}

/// The record store.
///
/// Sole owner of the six collections. Every mutation is synchronous: the
/// backing collection is edited, all snapshots are rebuilt, and every
/// subscriber is notified before the call returns.
///
/// Mutations are serialised by a per-store reentrant lock, so concurrent
/// writers are observed in invocation order while a subscriber callback may
/// still mutate the store from the notifying thread.
pub struct Store {
    /// Store configuration.
    config: StoreConfig,

    /// Collections and their snapshots.
    tables: RwLock<Tables>,

    /// Change subscribers.
    subscriptions: Arc<SubscriptionManager>,

    /// Held across mutate, rebuild and notify.
    write_lock: ReentrantMutex<()>,
}

impl Store {
    /// Open a store, loading the sample records when `config.seed` is set.
    pub fn open(config: StoreConfig) -> Self {
        let seed = if config.seed {
            Seed::sample()
        } else {
            Seed::empty()
        };
        Self::from_seed(config, seed)
    }

    /// Create an empty store.
    pub fn new(config: StoreConfig) -> Self {
        Self::from_seed(config, Seed::empty())
    }

    /// Create a store holding the given records.
    pub fn from_seed(config: StoreConfig, seed: Seed) -> Self {
        info!(
            records = seed.record_count(),
            id_strategy = ?config.id_strategy,
            "opening store"
        );
        let tables = Tables::load(seed, config.id_strategy);
        Self {
            config,
            tables: RwLock::new(tables),
            subscriptions: Arc::new(SubscriptionManager::new()),
            write_lock: ReentrantMutex::new(()),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Revision after the most recent mutation (0 for a fresh store).
    pub fn revision(&self) -> Revision {
        self.tables.read().revision
    }

    /// Rebuild snapshots, bump the revision, release the data lock, notify.
    fn publish(&self, mut tables: RwLockWriteGuard<'_, Tables>) -> Revision {
        let revision = tables.commit();
        drop(tables);
        self.subscriptions.notify(revision);
        revision
    }

    // --- Generic Record Operations ---

    /// Current snapshot of a collection.
    pub fn all<C: Entity>(&self) -> Snapshot<C> {
        C::table(&self.tables.read()).snapshot.clone()
    }

    /// Record with the given id.
    pub fn get<C: Entity>(&self, id: &str) -> Option<C> {
        C::table(&self.tables.read()).find(id).cloned()
    }

    /// Number of records in a collection.
    pub fn len<C: Entity>(&self) -> usize {
        C::table(&self.tables.read()).rows.len()
    }

    /// Assign an identifier, append the record and notify.
    ///
    /// No validation is performed here; see [`Entity::validate`].
    pub fn add<C: Entity>(&self, input: C::Input) -> C {
        let _lock = self.write_lock.lock();

        let mut tables = self.tables.write();
        let record = C::table_mut(&mut tables).insert(input);
        let revision = self.publish(tables);

        debug!(collection = %C::COLLECTION, id = record.id(), %revision, "record added");
        record
    }

    /// Shallow-merge `patch` into the record with the given id and notify.
    ///
    /// A missing id leaves the collection untouched, notifies nobody and
    /// returns [`StoreError::RecordNotFound`].
    pub fn update<C: Entity>(&self, id: &str, patch: C::Patch) -> Result<C> {
        let _lock = self.write_lock.lock();

        let mut tables = self.tables.write();
        let record = C::table_mut(&mut tables)
            .update(id, patch)
            .ok_or_else(|| not_found::<C>(id))?;
        let revision = self.publish(tables);

        debug!(collection = %C::COLLECTION, id, %revision, "record updated");
        Ok(record)
    }

    /// Remove the record with the given id and notify. Returns the removed
    /// record; a missing id notifies nobody.
    pub fn delete<C: Deletable>(&self, id: &str) -> Result<C> {
        let _lock = self.write_lock.lock();

        let mut tables = self.tables.write();
        let record = C::table_mut(&mut tables)
            .remove(id)
            .ok_or_else(|| not_found::<C>(id))?;
        let revision = self.publish(tables);

        debug!(collection = %C::COLLECTION, id, %revision, "record deleted");
        Ok(record)
    }

    // --- Subscriptions ---

    /// Register a callback run after every mutation, in registration order.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionHandle
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.subscriptions.subscribe(listener)
    }

    /// Open a channel subscription with the configured buffer size.
    pub fn subscribe_channel(&self) -> ChannelSubscription {
        self.subscriptions
            .subscribe_channel(self.config.channel_buffer_size)
    }

    /// Open a channel subscription with an explicit buffer size.
    pub fn subscribe_channel_with(&self, buffer_size: usize) -> ChannelSubscription {
        self.subscriptions.subscribe_channel(buffer_size)
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.subscription_count()
    }

    // --- Invoice Lookups ---

    /// Receipts whose soft reference names the given invoice.
    pub fn receipts_for_invoice(&self, invoice_id: &str) -> Vec<Receipt> {
        self.all::<Receipt>()
            .iter()
            .filter(|receipt| receipt.invoice_id == invoice_id)
            .cloned()
            .collect()
    }

    /// Sum of the receipts recorded against an invoice id.
    pub fn receipts_total_for(&self, invoice_id: &str) -> Decimal {
        sum_amounts(
            self.all::<Receipt>()
                .iter()
                .filter(|receipt| receipt.invoice_id == invoice_id)
                .map(|receipt| receipt.amount),
        )
    }

    /// Printable summary of an invoice.
    pub fn invoice_summary(&self, invoice_id: &str) -> Result<InvoiceSummary> {
        self.all::<Invoice>()
            .find(invoice_id)
            .map(Invoice::summary)
            .ok_or_else(|| not_found::<Invoice>(invoice_id))
    }

    /// Remaining balance (`total - paid_total`) of an invoice.
    pub fn invoice_balance(&self, invoice_id: &str) -> Result<Decimal> {
        self.all::<Invoice>()
            .find(invoice_id)
            .map(Invoice::remaining)
            .ok_or_else(|| not_found::<Invoice>(invoice_id))
    }

    /// Get store statistics.
    pub fn stats(&self) -> StoreStats {
        let tables = self.tables.read();
        StoreStats {
            customer_count: tables.customers.rows.len(),
            product_count: tables.products.rows.len(),
            invoice_count: tables.invoices.rows.len(),
            employee_count: tables.employees.rows.len(),
            branch_count: tables.branches.rows.len(),
            receipt_count: tables.receipts.rows.len(),
            subscriber_count: self.subscriptions.subscription_count(),
            revision: tables.revision,
        }
    }

    // --- Customers ---

    pub fn get_customers(&self) -> Snapshot<Customer> {
        self.all()
    }

    pub fn add_customer(&self, input: CustomerInput) -> Customer {
        self.add(input)
    }

    pub fn update_customer(&self, id: &str, patch: CustomerPatch) -> Result<Customer> {
        self.update(id, patch)
    }

    pub fn delete_customer(&self, id: &str) -> Result<Customer> {
        self.delete(id)
    }

    // --- Products ---

    pub fn get_products(&self) -> Snapshot<Product> {
        self.all()
    }

    pub fn add_product(&self, input: ProductInput) -> Product {
        self.add(input)
    }

    pub fn update_product(&self, id: &str, patch: ProductPatch) -> Result<Product> {
        self.update(id, patch)
    }

    pub fn delete_product(&self, id: &str) -> Result<Product> {
        self.delete(id)
    }

    // --- Invoices (no deletion) ---

    pub fn get_invoices(&self) -> Snapshot<Invoice> {
        self.all()
    }

    pub fn add_invoice(&self, input: InvoiceInput) -> Invoice {
        self.add(input)
    }

    pub fn update_invoice(&self, id: &str, patch: InvoicePatch) -> Result<Invoice> {
        self.update(id, patch)
    }

    // --- Employees ---

    pub fn get_employees(&self) -> Snapshot<Employee> {
        self.all()
    }

    pub fn add_employee(&self, input: EmployeeInput) -> Employee {
        self.add(input)
    }

    pub fn update_employee(&self, id: &str, patch: EmployeePatch) -> Result<Employee> {
        self.update(id, patch)
    }

    pub fn delete_employee(&self, id: &str) -> Result<Employee> {
        self.delete(id)
    }

    // --- Branches ---

    pub fn get_branches(&self) -> Snapshot<Branch> {
        self.all()
    }

    pub fn add_branch(&self, input: BranchInput) -> Branch {
        self.add(input)
    }

    pub fn update_branch(&self, id: &str, patch: BranchPatch) -> Result<Branch> {
        self.update(id, patch)
    }

    pub fn delete_branch(&self, id: &str) -> Result<Branch> {
        self.delete(id)
    }

    // --- Receipts (no deletion) ---

    pub fn get_receipts(&self) -> Snapshot<Receipt> {
        self.all()
    }

    pub fn add_receipt(&self, input: ReceiptInput) -> Receipt {
        self.add(input)
    }

    pub fn update_receipt(&self, id: &str, patch: ReceiptPatch) -> Result<Receipt> {
        self.update(id, patch)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::open(StoreConfig::default())
    }
}

fn not_found<C: Entity>(id: &str) -> StoreError {
    StoreError::RecordNotFound {
        collection: C::COLLECTION,
        id: id.to_string(),
    }
}
