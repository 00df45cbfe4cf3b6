//! Record types held by the store.
//!
//! Each collection has three shapes: the stored record (with its `id`), an
//! input (everything but the `id`, used when adding) and a patch (every field
//! optional, shallow-merged when updating).

mod branch;
mod customer;
mod employee;
mod invoice;
mod product;
mod receipt;

pub use branch::{Branch, BranchInput, BranchPatch};
pub use customer::{Customer, CustomerInput, CustomerPatch};
pub use employee::{Employee, EmployeeInput, EmployeePatch};
pub use invoice::{
    calc_total, sum_amounts, Invoice, InvoiceInput, InvoiceItem, InvoicePatch, InvoiceStatus,
    InvoiceSummary,
};
pub use product::{Product, ProductInput, ProductPatch};
pub use receipt::{Receipt, ReceiptInput, ReceiptPatch, DEFAULT_PAYMENT_METHOD};

use crate::error::ValidationError;
use crate::store::{Table, Tables};
use crate::types::Collection;
use std::fmt;

mod sealed {
    pub trait Sealed {}
}

/// A record type stored in one of the store's collections.
///
/// Sealed: the six collections are fixed.
pub trait Entity: sealed::Sealed + Clone + fmt::Debug + Send + Sync + 'static {
    /// Fields supplied when adding (everything except the id).
    type Input: Clone + fmt::Debug + Send;

    /// Partial update; `None` fields are left untouched.
    type Patch: Default + fmt::Debug;

    const COLLECTION: Collection;

    fn id(&self) -> &str;

    fn from_input(id: String, input: Self::Input) -> Self;

    /// Shallow-merge the present fields of `patch` into `self`.
    fn apply_patch(&mut self, patch: Self::Patch);

    /// Required-field checks performed by the entry screens.
    fn validate(input: &Self::Input) -> Result<(), ValidationError>;

    #[doc(hidden)]
    fn table(tables: &Tables) -> &Table<Self>;

    #[doc(hidden)]
    fn table_mut(tables: &mut Tables) -> &mut Table<Self>;
}

/// Entities whose collection supports removal.
///
/// Invoices and receipts are update-only.
pub trait Deletable: Entity {}

/// Overwrite `slot` when the patch carries a value.
fn merge<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

fn require(
    collection: Collection,
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField { collection, field })
    } else {
        Ok(())
    }
}
