use super::{merge, require, sealed, Entity};
use crate::error::ValidationError;
use crate::store::{Table, Tables};
use crate::types::Collection;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Invoice workflow status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Confirmed,
    Delivered,
    Closed,
}

impl InvoiceStatus {
    /// Label shown on screen and in exports.
    pub fn label(self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "مسودة",
            InvoiceStatus::Confirmed => "مؤكدة",
            InvoiceStatus::Delivered => "تم التسليم",
            InvoiceStatus::Closed => "مغلقة",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        [
            InvoiceStatus::Draft,
            InvoiceStatus::Confirmed,
            InvoiceStatus::Delivered,
            InvoiceStatus::Closed,
        ]
        .into_iter()
        .find(|s| s.label() == label)
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One invoice line. Embedded in its invoice, never addressed on its own.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub product_name: String,
    pub qty: Decimal,
    pub unit_price: Decimal,
    pub line_discount: Decimal,
}

impl InvoiceItem {
    pub fn new(product_name: impl Into<String>, qty: Decimal, unit_price: Decimal) -> Self {
        Self {
            product_name: product_name.into(),
            qty,
            unit_price,
            line_discount: Decimal::ZERO,
        }
    }

    pub fn with_discount(mut self, discount: Decimal) -> Self {
        self.line_discount = discount;
        self
    }

    /// `qty * unit_price - line_discount`, saturating at the `Decimal` bounds.
    pub fn line_total(&self) -> Decimal {
        self.qty
            .saturating_mul(self.unit_price)
            .saturating_sub(self.line_discount)
    }
}

/// Saturating sum. Amounts are stored unchecked, so derived figures clamp
/// to `Decimal::MAX`/`Decimal::MIN` instead of overflowing.
pub fn sum_amounts<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |acc, amount| acc.saturating_add(amount))
}

/// `total * percent / 100`, saturating.
fn commission(total: Decimal, percent: Decimal) -> Decimal {
    total.saturating_mul(percent) / Decimal::ONE_HUNDRED
}

/// Sum of the line totals.
pub fn calc_total(items: &[InvoiceItem]) -> Decimal {
    sum_amounts(items.iter().map(InvoiceItem::line_total))
}

/// A sales invoice.
///
/// The total is never stored; it is recomputed from `items` on every call.
/// `customer`, `branch` and `employee` are display names, not references.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub customer: String,
    pub branch: String,
    pub employee: String,
    pub date: NaiveDate,
    pub items: Vec<InvoiceItem>,
    pub status: InvoiceStatus,
    pub paid_total: Decimal,
    pub commission_percent: Decimal,
}

impl Invoice {
    pub fn total(&self) -> Decimal {
        calc_total(&self.items)
    }

    /// `total - paid_total`
    pub fn remaining(&self) -> Decimal {
        self.total().saturating_sub(self.paid_total)
    }

    /// `total * commission_percent / 100`
    pub fn commission_amount(&self) -> Decimal {
        commission(self.total(), self.commission_percent)
    }

    /// `YYYY-MM` bucket used by the monthly sales chart.
    pub fn month(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }

    /// Self-consistent printable view of this invoice.
    pub fn summary(&self) -> InvoiceSummary {
        let line_totals: Vec<Decimal> = self.items.iter().map(InvoiceItem::line_total).collect();
        let total = sum_amounts(line_totals.iter().copied());
        InvoiceSummary {
            invoice: self.clone(),
            line_totals,
            total,
            paid_total: self.paid_total,
            remaining: total.saturating_sub(self.paid_total),
            commission_amount: commission(total, self.commission_percent),
        }
    }
}

/// An invoice with every derived amount computed at one point in time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummary {
    pub invoice: Invoice,
    /// Parallel to `invoice.items`.
    pub line_totals: Vec<Decimal>,
    pub total: Decimal,
    pub paid_total: Decimal,
    pub remaining: Decimal,
    pub commission_amount: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceInput {
    pub customer: String,
    pub branch: String,
    pub employee: String,
    pub date: NaiveDate,
    pub items: Vec<InvoiceItem>,
    pub status: InvoiceStatus,
    pub paid_total: Decimal,
    pub commission_percent: Decimal,
}

impl Default for InvoiceInput {
    /// A draft dated today with nothing paid.
    fn default() -> Self {
        Self {
            customer: String::new(),
            branch: String::new(),
            employee: String::new(),
            date: Utc::now().date_naive(),
            items: Vec::new(),
            status: InvoiceStatus::Draft,
            paid_total: Decimal::ZERO,
            commission_percent: Decimal::ZERO,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoicePatch {
    pub customer: Option<String>,
    pub branch: Option<String>,
    pub employee: Option<String>,
    pub date: Option<NaiveDate>,
    /// Replaces the whole item list.
    pub items: Option<Vec<InvoiceItem>>,
    pub status: Option<InvoiceStatus>,
    pub paid_total: Option<Decimal>,
    pub commission_percent: Option<Decimal>,
}

impl sealed::Sealed for Invoice {}

impl Entity for Invoice {
    type Input = InvoiceInput;
    type Patch = InvoicePatch;

    const COLLECTION: Collection = Collection::Invoices;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_input(id: String, input: InvoiceInput) -> Self {
        Self {
            id,
            customer: input.customer,
            branch: input.branch,
            employee: input.employee,
            date: input.date,
            items: input.items,
            status: input.status,
            paid_total: input.paid_total,
            commission_percent: input.commission_percent,
        }
    }

    fn apply_patch(&mut self, patch: InvoicePatch) {
        merge(&mut self.customer, patch.customer);
        merge(&mut self.branch, patch.branch);
        merge(&mut self.employee, patch.employee);
        merge(&mut self.date, patch.date);
        merge(&mut self.items, patch.items);
        merge(&mut self.status, patch.status);
        merge(&mut self.paid_total, patch.paid_total);
        merge(&mut self.commission_percent, patch.commission_percent);
    }

    fn validate(input: &InvoiceInput) -> Result<(), ValidationError> {
        require(Self::COLLECTION, "customer", &input.customer)?;
        match input
            .items
            .iter()
            .position(|item| item.product_name.trim().is_empty())
        {
            Some(index) => Err(ValidationError::UnnamedItem { index }),
            None => Ok(()),
        }
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.invoices
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.invoices
    }
}
