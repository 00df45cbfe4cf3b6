//! # Showroom
//!
//! In-memory back-office record store for a furniture showroom: customers,
//! products, invoices, employees, branches and payment receipts, with
//! synchronous change notification for the screens that display them.
//!
//! ## Core Concepts
//!
//! - **Store**: sole owner of the six collections; every mutation rebuilds the
//!   snapshots and notifies subscribers before it returns
//! - **Snapshots**: immutable, cheaply cloned views that change identity only
//!   when the store changes
//! - **Views**: per-screen handles that track staleness and forward edits
//! - **Reports**: dashboard figures and report tables derived from snapshots
//!
//! ## Example
//!
//! ```ignore
//! use showroom::{ReceiptInput, Store, StoreConfig};
//! use rust_decimal::Decimal;
//!
//! let store = Store::open(StoreConfig::default());
//!
//! let invoices = store.invoices();
//! let receipt = store.add_receipt(ReceiptInput {
//!     invoice_id: "INV-002".into(),
//!     amount: Decimal::from(5000),
//!     ..Default::default()
//! });
//!
//! assert!(invoices.is_stale());
//! assert_eq!(store.receipts_total_for("INV-002"), Decimal::from(5000));
//! ```

pub mod error;
pub mod export;
pub mod ids;
pub mod records;
pub mod reports;
pub mod seed;
pub mod store;
pub mod subscriptions;
pub mod types;
pub mod views;

// Re-exports
pub use error::{Result, StoreError, ValidationError};
pub use export::{Column, ExportTable, Row, Tabular};
pub use ids::{format_id, parse_id, IdAllocator, IdStrategy};
pub use records::{
    calc_total, sum_amounts, Branch, BranchInput, BranchPatch, Customer, CustomerInput,
    CustomerPatch, Deletable, Employee, EmployeeInput, EmployeePatch, Entity, Invoice,
    InvoiceInput, InvoiceItem, InvoicePatch, InvoiceStatus, InvoiceSummary, Product, ProductInput,
    ProductPatch, Receipt, ReceiptInput, ReceiptPatch, DEFAULT_PAYMENT_METHOD,
};
pub use reports::{
    CustomerBalance, DashboardStats, EmployeeCommission, MonthlySales, ProductRevenue, SalesRow,
};
pub use seed::Seed;
pub use store::{Snapshot, Store, StoreConfig};
pub use subscriptions::{
    ChannelSubscription, DropReason, StoreEvent, SubscriptionHandle, SubscriptionId,
    SubscriptionManager,
};
pub use types::*;
pub use views::CollectionView;
