//! Dashboard figures and report tables.
//!
//! Everything here is a pure function over snapshots. Soft references are
//! matched by display name, so renaming a customer detaches their invoices.

use crate::records::{Customer, Invoice};
use crate::store::Store;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// Number of products shown on the dashboard.
pub const TOP_PRODUCTS_LIMIT: usize = 5;

/// Number of invoices in the dashboard's "recent" list.
pub const RECENT_INVOICES_LIMIT: usize = 4;

/// Headline figures of the dashboard.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_sales: Decimal,
    pub total_paid: Decimal,
    /// `total_sales - total_paid`
    pub pending: Decimal,
    pub invoice_count: usize,
    pub customer_count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRevenue {
    pub product_name: String,
    pub revenue: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySales {
    /// `YYYY-MM`
    pub month: String,
    pub total: Decimal,
}

/// One line of the sales report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesRow {
    pub invoice_id: String,
    pub customer: String,
    pub date: NaiveDate,
    pub total: Decimal,
    pub paid: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerBalance {
    pub customer_id: String,
    pub customer: String,
    pub total: Decimal,
    pub paid: Decimal,
    pub balance: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeCommission {
    pub employee: String,
    pub invoice_count: usize,
    pub total_sales: Decimal,
    /// Set only when all of the employee's invoices share one percent.
    pub commission_percent: Option<Decimal>,
    pub commission_amount: Decimal,
}

pub fn dashboard_stats<'a, I>(invoices: I, customer_count: usize) -> DashboardStats
where
    I: IntoIterator<Item = &'a Invoice>,
{
    let mut stats = DashboardStats {
        customer_count,
        ..Default::default()
    };
    for invoice in invoices {
        stats.total_sales = stats.total_sales.saturating_add(invoice.total());
        stats.total_paid = stats.total_paid.saturating_add(invoice.paid_total);
        stats.invoice_count += 1;
    }
    stats.pending = stats.total_sales.saturating_sub(stats.total_paid);
    stats
}

/// Revenue per product name, highest first. Ties keep first-seen order.
pub fn top_products<'a, I>(invoices: I, limit: usize) -> Vec<ProductRevenue>
where
    I: IntoIterator<Item = &'a Invoice>,
{
    let mut rows: Vec<ProductRevenue> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in invoices.into_iter().flat_map(|invoice| invoice.items.iter()) {
        match index.get(&item.product_name) {
            Some(&i) => rows[i].revenue = rows[i].revenue.saturating_add(item.line_total()),
            None => {
                index.insert(item.product_name.clone(), rows.len());
                rows.push(ProductRevenue {
                    product_name: item.product_name.clone(),
                    revenue: item.line_total(),
                });
            }
        }
    }

    // Stable sort.
    rows.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    rows.truncate(limit);
    rows
}

/// Invoice totals grouped by month, in first-seen order.
pub fn sales_by_month<'a, I>(invoices: I) -> Vec<MonthlySales>
where
    I: IntoIterator<Item = &'a Invoice>,
{
    let mut rows: Vec<MonthlySales> = Vec::new();
    for invoice in invoices {
        let month = invoice.month();
        match rows.iter_mut().find(|row| row.month == month) {
            Some(row) => row.total = row.total.saturating_add(invoice.total()),
            None => rows.push(MonthlySales {
                month,
                total: invoice.total(),
            }),
        }
    }
    rows
}

/// The last `n` invoices added, newest first.
pub fn recent_invoices<'a, I>(invoices: I, n: usize) -> Vec<&'a Invoice>
where
    I: IntoIterator<Item = &'a Invoice>,
    I::IntoIter: DoubleEndedIterator,
{
    invoices.into_iter().rev().take(n).collect()
}

/// Invoices dated within `from..=to`.
pub fn sales_report<'a, I>(invoices: I, from: NaiveDate, to: NaiveDate) -> Vec<SalesRow>
where
    I: IntoIterator<Item = &'a Invoice>,
{
    invoices
        .into_iter()
        .filter(|invoice| invoice.date >= from && invoice.date <= to)
        .map(|invoice| SalesRow {
            invoice_id: invoice.id.clone(),
            customer: invoice.customer.clone(),
            date: invoice.date,
            total: invoice.total(),
            paid: invoice.paid_total,
        })
        .collect()
}

/// Totals owed per customer, in customer order.
pub fn customer_balances<'a, 'b, C, I>(customers: C, invoices: I) -> Vec<CustomerBalance>
where
    C: IntoIterator<Item = &'a Customer>,
    I: IntoIterator<Item = &'b Invoice>,
{
    let mut by_name: HashMap<&str, (Decimal, Decimal)> = HashMap::new();
    for invoice in invoices {
        let entry = by_name
            .entry(invoice.customer.as_str())
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        entry.0 = entry.0.saturating_add(invoice.total());
        entry.1 = entry.1.saturating_add(invoice.paid_total);
    }

    customers
        .into_iter()
        .map(|customer| {
            let (total, paid) = by_name
                .get(customer.full_name.as_str())
                .copied()
                .unwrap_or((Decimal::ZERO, Decimal::ZERO));
            CustomerBalance {
                customer_id: customer.id.clone(),
                customer: customer.full_name.clone(),
                total,
                paid,
                balance: total.saturating_sub(paid),
            }
        })
        .collect()
}

/// Sales and commission per employee name, in first-seen order.
pub fn commission_report<'a, I>(invoices: I) -> Vec<EmployeeCommission>
where
    I: IntoIterator<Item = &'a Invoice>,
{
    // (row, percent seen first, all percents equal so far)
    let mut rows: Vec<(EmployeeCommission, Decimal, bool)> = Vec::new();

    for invoice in invoices {
        let total = invoice.total();
        let commission = invoice.commission_amount();
        match rows
            .iter_mut()
            .find(|(row, _, _)| row.employee == invoice.employee)
        {
            Some((row, first_percent, uniform)) => {
                row.invoice_count += 1;
                row.total_sales = row.total_sales.saturating_add(total);
                row.commission_amount = row.commission_amount.saturating_add(commission);
                *uniform &= *first_percent == invoice.commission_percent;
            }
            None => rows.push((
                EmployeeCommission {
                    employee: invoice.employee.clone(),
                    invoice_count: 1,
                    total_sales: total,
                    commission_percent: None,
                    commission_amount: commission,
                },
                invoice.commission_percent,
                true,
            )),
        }
    }

    rows.into_iter()
        .map(|(mut row, percent, uniform)| {
            row.commission_percent = uniform.then_some(percent);
            row
        })
        .collect()
}

impl Store {
    /// Headline figures over the current snapshots.
    pub fn dashboard(&self) -> DashboardStats {
        dashboard_stats(&self.get_invoices(), self.get_customers().len())
    }

    pub fn top_products(&self, limit: usize) -> Vec<ProductRevenue> {
        top_products(&self.get_invoices(), limit)
    }

    pub fn sales_by_month(&self) -> Vec<MonthlySales> {
        sales_by_month(&self.get_invoices())
    }

    pub fn recent_invoices(&self, n: usize) -> Vec<Invoice> {
        recent_invoices(&self.get_invoices(), n)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn sales_report(&self, from: NaiveDate, to: NaiveDate) -> Vec<SalesRow> {
        sales_report(&self.get_invoices(), from, to)
    }

    pub fn customer_balances(&self) -> Vec<CustomerBalance> {
        customer_balances(&self.get_customers(), &self.get_invoices())
    }

    pub fn commission_report(&self) -> Vec<EmployeeCommission> {
        commission_report(&self.get_invoices())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{InvoiceInput, InvoiceItem};
    use crate::store::StoreConfig;

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn sample() -> Store {
        Store::open(StoreConfig::default())
    }

    #[test]
    fn test_dashboard_on_sample() {
        let stats = sample().dashboard();
        assert_eq!(stats.total_sales, dec(57500));
        assert_eq!(stats.total_paid, dec(15000));
        assert_eq!(stats.pending, dec(42500));
        assert_eq!(stats.invoice_count, 2);
        assert_eq!(stats.customer_count, 3);
    }

    #[test]
    fn test_top_products_order() {
        let top = sample().top_products(TOP_PRODUCTS_LIMIT);
        let names: Vec<_> = top.iter().map(|p| p.product_name.as_str()).collect();
        assert_eq!(names, vec!["غرفة نوم كاملة", "طقم أنتريه مودرن", "دولاب ملابس"]);
        assert_eq!(top[0].revenue, dec(24000));
        assert_eq!(sample().top_products(1).len(), 1);
    }

    #[test]
    fn test_top_products_ties_keep_first_seen() {
        let store = Store::new(StoreConfig::default());
        store.add_invoice(InvoiceInput {
            items: vec![
                InvoiceItem::new("b", dec(1), dec(10)),
                InvoiceItem::new("a", dec(1), dec(10)),
            ],
            ..Default::default()
        });
        let names: Vec<_> = store
            .top_products(5)
            .into_iter()
            .map(|p| p.product_name)
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_sales_by_month() {
        let store = sample();
        store.add_invoice(InvoiceInput {
            date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            items: vec![InvoiceItem::new("x", dec(1), dec(100))],
            ..Default::default()
        });
        let months = store.sales_by_month();
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].month, "2025-06");
        assert_eq!(months[0].total, dec(57500));
        assert_eq!(months[1].total, dec(100));
    }

    #[test]
    fn test_recent_invoices_newest_first() {
        let store = sample();
        for _ in 0..4 {
            store.add_invoice(InvoiceInput::default());
        }

        let recent = store.recent_invoices(RECENT_INVOICES_LIMIT);
        let ids: Vec<_> = recent.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["INV-006", "INV-005", "INV-004", "INV-003"]);
        assert_eq!(sample().recent_invoices(RECENT_INVOICES_LIMIT).len(), 2);
    }

    #[test]
    fn test_reports_survive_oversized_invoices() {
        let store = sample();
        let huge = InvoiceItem::new(
            "غرفة نوم كاملة",
            dec(1_000_000_000_000),
            dec(1_000_000_000_000_000_000),
        );
        for _ in 0..2 {
            store.add_invoice(InvoiceInput {
                customer: "أحمد محمد علي".into(),
                employee: "محمد سعيد".into(),
                items: vec![huge.clone()],
                commission_percent: dec(3),
                ..Default::default()
            });
        }

        let stats = store.dashboard();
        assert_eq!(stats.total_sales, Decimal::MAX);
        assert_eq!(stats.pending, Decimal::MAX - dec(15000));
        assert_eq!(store.top_products(1)[0].revenue, Decimal::MAX);
        assert_eq!(store.sales_by_month().len(), 2);
        assert_eq!(store.customer_balances()[0].total, Decimal::MAX);
        assert_eq!(store.commission_report()[0].total_sales, Decimal::MAX);
        assert_eq!(store.invoice_summary("INV-003").unwrap().total, Decimal::MAX);
    }

    #[test]
    fn test_sales_report_range_is_inclusive() {
        let store = sample();
        assert_eq!(store.sales_report(day(15), day(16)).len(), 2);
        let only_first = store.sales_report(day(1), day(15));
        assert_eq!(only_first.len(), 1);
        assert_eq!(only_first[0].invoice_id, "INV-001");
        assert_eq!(only_first[0].paid, dec(15000));
        assert!(store.sales_report(day(17), day(30)).is_empty());
    }

    #[test]
    fn test_customer_balances() {
        let balances = sample().customer_balances();
        assert_eq!(balances.len(), 3);
        assert_eq!(balances[0].balance, dec(9000));
        assert_eq!(balances[1].total, dec(33500));
        assert_eq!(balances[2].total, Decimal::ZERO);
        assert_eq!(balances[2].balance, Decimal::ZERO);
    }

    #[test]
    fn test_commission_report() {
        let store = sample();
        store.add_invoice(InvoiceInput {
            employee: "محمد سعيد".into(),
            items: vec![InvoiceItem::new("x", dec(1), dec(1000))],
            commission_percent: dec(5),
            ..Default::default()
        });

        let report = store.commission_report();
        assert_eq!(report.len(), 2);

        let mohamed = &report[0];
        assert_eq!(mohamed.invoice_count, 2);
        assert_eq!(mohamed.total_sales, dec(25000));
        assert_eq!(mohamed.commission_percent, None);
        assert_eq!(mohamed.commission_amount, dec(770));

        let ali = &report[1];
        assert_eq!(ali.commission_percent, Some(Decimal::new(25, 1)));
        assert_eq!(ali.commission_amount, Decimal::new(8375, 1));
    }
}
