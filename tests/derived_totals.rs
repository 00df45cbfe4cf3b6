//! Derived invoice amounts and report consistency.

use proptest::prelude::*;
use rust_decimal::Decimal;
use showroom::reports::{commission_report, dashboard_stats, sales_by_month, top_products};
use showroom::{calc_total, Invoice, InvoiceInput, InvoiceItem, InvoicePatch, Store, StoreConfig};

fn item() -> impl Strategy<Value = InvoiceItem> {
    (1i64..20, 0i64..50_000, 0i64..1_000).prop_map(|(qty, price, discount)| {
        InvoiceItem::new("صنف", Decimal::from(qty), Decimal::from(price))
            .with_discount(Decimal::from(discount))
    })
}

fn invoice_input() -> impl Strategy<Value = InvoiceInput> {
    (
        prop::collection::vec(item(), 0..8),
        0i64..100_000,
        0u32..10,
        prop::sample::select(vec!["محمد سعيد", "علي حسن"]),
    )
        .prop_map(|(items, paid, percent, employee)| InvoiceInput {
            items,
            paid_total: Decimal::from(paid),
            commission_percent: Decimal::from(percent),
            employee: employee.to_string(),
            ..Default::default()
        })
}

proptest! {
    #[test]
    fn prop_total_matches_line_totals(input in invoice_input()) {
        let store = Store::new(StoreConfig::default());
        let invoice = store.add_invoice(input.clone());

        let by_hand: Decimal = input
            .items
            .iter()
            .map(|i| i.qty * i.unit_price - i.line_discount)
            .sum();
        prop_assert_eq!(invoice.total(), by_hand);
        prop_assert_eq!(calc_total(&invoice.items), by_hand);

        let summary = store.invoice_summary(&invoice.id).unwrap();
        prop_assert_eq!(summary.total, summary.line_totals.iter().copied().sum::<Decimal>());
        prop_assert_eq!(summary.remaining, summary.total - summary.paid_total);
    }

    #[test]
    fn prop_total_follows_item_updates(
        input in invoice_input(),
        replacement in prop::collection::vec(item(), 0..8),
    ) {
        let store = Store::new(StoreConfig::default());
        let invoice = store.add_invoice(input);

        let updated = store
            .update_invoice(&invoice.id, InvoicePatch {
                items: Some(replacement.clone()),
                ..Default::default()
            })
            .unwrap();

        prop_assert_eq!(updated.total(), calc_total(&replacement));
        let stored = store.get::<Invoice>(&invoice.id).unwrap();
        prop_assert_eq!(stored.total(), calc_total(&replacement));
    }

    #[test]
    fn prop_reports_agree_with_dashboard(inputs in prop::collection::vec(invoice_input(), 0..10)) {
        let store = Store::new(StoreConfig::default());
        for input in inputs {
            store.add_invoice(input);
        }
        let invoices = store.get_invoices();
        let stats = dashboard_stats(&invoices, 0);

        let monthly: Decimal = sales_by_month(&invoices).iter().map(|m| m.total).sum();
        prop_assert_eq!(monthly, stats.total_sales);

        let by_product: Decimal = top_products(&invoices, usize::MAX).iter().map(|p| p.revenue).sum();
        prop_assert_eq!(by_product, stats.total_sales);

        let by_employee: Decimal = commission_report(&invoices).iter().map(|e| e.total_sales).sum();
        prop_assert_eq!(by_employee, stats.total_sales);
        prop_assert_eq!(stats.pending, stats.total_sales - stats.total_paid);
    }
}
