//! Core types for the record store.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the six top-level record sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Customers,
    Products,
    Invoices,
    Employees,
    Branches,
    Receipts,
}

impl Collection {
    /// Prefix of the human-readable identifiers in this collection.
    pub fn id_prefix(self) -> &'static str {
        match self {
            Collection::Customers => "C",
            Collection::Products => "P",
            Collection::Invoices => "INV-",
            Collection::Employees => "E",
            Collection::Branches => "B",
            Collection::Receipts => "R",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Customers => "customers",
            Collection::Products => "products",
            Collection::Invoices => "invoices",
            Collection::Employees => "employees",
            Collection::Branches => "branches",
            Collection::Receipts => "receipts",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store mutation counter. Bumped once per successful mutation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Revision(pub u64);

impl Revision {
    pub fn next(self) -> Self {
        Revision(self.0 + 1)
    }
}

impl fmt::Debug for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rev({})", self.0)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Store statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub customer_count: usize,
    pub product_count: usize,
    pub invoice_count: usize,
    pub employee_count: usize,
    pub branch_count: usize,
    pub receipt_count: usize,
    pub subscriber_count: usize,
    pub revision: Revision,
}
