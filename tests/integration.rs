//! Integration tests for the showroom store.

use parking_lot::Mutex;
use rust_decimal::Decimal;
use showroom::{
    CustomerInput, EmployeePatch, ExportTable, Invoice, InvoiceInput, InvoiceItem, InvoiceStatus,
    InvoicePatch, ProductInput, Receipt, ReceiptInput, Revision, Seed, Store, StoreConfig,
    StoreEvent,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn dec(n: i64) -> Decimal {
    Decimal::from(n)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn sample_store() -> Store {
    init_tracing();
    Store::open(StoreConfig::default())
}

// --- Snapshot Semantics ---

#[test]
fn test_snapshot_stability_without_mutation() {
    let store = sample_store();

    let a = store.get_invoices();
    let _ = store.get_customers();
    let _ = store.receipts_total_for("INV-001");
    let b = store.get_invoices();

    assert!(a.ptr_eq(&b));
}

#[test]
fn test_snapshot_freshness_after_each_mutation() {
    let store = sample_store();

    let before = store.get_customers();
    let added = store.add_customer(CustomerInput {
        full_name: "خالد يوسف".into(),
        phone: "01555555555".into(),
        ..Default::default()
    });
    let after = store.get_customers();
    assert!(!before.ptr_eq(&after));
    assert_eq!(after.last().unwrap(), &added);

    store.delete_customer(&added.id).unwrap();
    let gone = store.get_customers();
    assert!(!after.ptr_eq(&gone));
    assert!(gone.find(&added.id).is_none());

    // Held snapshots are untouched.
    assert_eq!(before.len(), 3);
    assert_eq!(after.len(), 4);
}

#[test]
fn test_snapshot_visible_inside_listener() {
    let store = Arc::new(sample_store());
    let seen = Arc::new(AtomicUsize::new(0));

    {
        let weak = Arc::downgrade(&store);
        let seen = Arc::clone(&seen);
        store.subscribe(move || {
            if let Some(store) = weak.upgrade() {
                seen.store(store.get_products().len(), Ordering::SeqCst);
            }
        });
    }

    store.add_product(ProductInput {
        name: "ترابيزة قهوة".into(),
        ..Default::default()
    });

    assert_eq!(seen.load(Ordering::SeqCst), 6);
}

// --- Notification ---

#[test]
fn test_fan_out_order_and_single_call() {
    let store = sample_store();
    let calls = Arc::new(Mutex::new(Vec::new()));

    for name in ["dashboard", "invoices", "reports"] {
        let calls = Arc::clone(&calls);
        store.subscribe(move || calls.lock().push(name));
    }

    store
        .update_invoice(
            "INV-002",
            InvoicePatch {
                status: Some(InvoiceStatus::Confirmed),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(*calls.lock(), vec!["dashboard", "invoices", "reports"]);
}

#[test]
fn test_missing_id_update_is_silent() {
    let store = sample_store();
    let calls = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&calls);
    store.subscribe(move || {
        c.fetch_add(1, Ordering::SeqCst);
    });

    let before = store.get_employees();
    assert!(store
        .update_employee(
            "E404",
            EmployeePatch {
                active: Some(false),
                ..Default::default()
            },
        )
        .is_err());

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(before.ptr_eq(&store.get_employees()));
}

#[test]
fn test_listener_may_mutate_store() {
    let store = Arc::new(Store::new(StoreConfig::default()));
    let rounds = Arc::new(AtomicUsize::new(0));

    {
        let weak = Arc::downgrade(&store);
        let rounds = Arc::clone(&rounds);
        store.subscribe(move || {
            // Mutate once from inside the first callback.
            if rounds.fetch_add(1, Ordering::SeqCst) == 0 {
                if let Some(store) = weak.upgrade() {
                    store.add_customer(CustomerInput {
                        full_name: "عميل تلقائي".into(),
                        ..Default::default()
                    });
                }
            }
        });
    }

    store.add_invoice(InvoiceInput::default());

    assert_eq!(rounds.load(Ordering::SeqCst), 2);
    assert_eq!(store.get_customers().len(), 1);
    assert_eq!(store.revision(), Revision(2));
}

#[test]
fn test_channel_order_with_nested_mutation() {
    let store = Arc::new(Store::new(StoreConfig::default()));
    let events = store.subscribe_channel();
    let fired = Arc::new(AtomicUsize::new(0));

    {
        let weak = Arc::downgrade(&store);
        let fired = Arc::clone(&fired);
        store.subscribe(move || {
            if fired.fetch_add(1, Ordering::SeqCst) == 0 {
                if let Some(store) = weak.upgrade() {
                    store.add_customer(CustomerInput::default());
                }
            }
        });
    }

    store.add_invoice(InvoiceInput::default());

    let revisions: Vec<Revision> = events
        .drain()
        .into_iter()
        .filter_map(|event| match event {
            StoreEvent::Changed { revision } => Some(revision),
            StoreEvent::Dropped { .. } => None,
        })
        .collect();
    assert_eq!(revisions, vec![Revision(1), Revision(2)]);
}

#[test]
fn test_channel_subscriber_on_other_thread() {
    let store = Arc::new(sample_store());
    let events = store.subscribe_channel();

    let consumer = thread::spawn(move || {
        let mut revisions = Vec::new();
        while let Ok(StoreEvent::Changed { revision }) =
            events.recv_timeout(Duration::from_millis(500))
        {
            revisions.push(revision);
            if revisions.len() == 3 {
                break;
            }
        }
        revisions
    });

    for _ in 0..3 {
        store.add_product(ProductInput::default());
    }

    let revisions = consumer.join().unwrap();
    assert_eq!(revisions, vec![Revision(1), Revision(2), Revision(3)]);
}

#[test]
fn test_concurrent_writers_are_serialised() {
    let store = Arc::new(Store::new(StoreConfig::default()));
    let mut workers = Vec::new();

    for _ in 0..4 {
        let store = Arc::clone(&store);
        workers.push(thread::spawn(move || {
            for _ in 0..25 {
                store.add_receipt(ReceiptInput {
                    invoice_id: "INV-001".into(),
                    amount: dec(1),
                    ..Default::default()
                });
            }
        }));
    }
    for worker in workers {
        worker.join().unwrap();
    }

    let receipts = store.get_receipts();
    assert_eq!(receipts.len(), 100);
    assert_eq!(store.revision(), Revision(100));
    assert_eq!(store.receipts_total_for("INV-001"), dec(100));

    let mut ids: Vec<&str> = receipts.iter().map(|r| r.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 100);
}

// --- End-to-End ---

#[test]
fn test_receipt_flow_from_first_receipt() {
    let mut seed = Seed::sample();
    seed.receipts.truncate(1);
    let store = Store::from_seed(StoreConfig::default(), seed);

    let invoice = store.get::<Invoice>("INV-001").unwrap();
    assert_eq!(invoice.total(), dec(24000));
    assert_eq!(store.receipts_total_for("INV-001"), dec(10000));

    let receipt = store.add_receipt(ReceiptInput {
        invoice_id: "INV-001".into(),
        customer: "أحمد محمد علي".into(),
        amount: dec(5000),
        method: "تحويل بنكي".into(),
        notes: "دفعة ثانية".into(),
        ..Default::default()
    });

    assert_eq!(receipt.id, "R002");
    assert_eq!(store.receipts_total_for("INV-001"), dec(15000));
    assert_eq!(store.receipts_for_invoice("INV-001").len(), 2);
}

#[test]
fn test_new_invoice_flow() {
    let store = sample_store();
    let invoices = store.invoices();

    let invoice = invoices
        .submit(InvoiceInput {
            customer: "محمود حسن إبراهيم".into(),
            branch: "القاهرة".into(),
            employee: "نورا أحمد".into(),
            items: vec![
                InvoiceItem::new("غرفة سفرة ٨ كراسي", dec(1), dec(22000)),
                InvoiceItem::new("دولاب ملابس", dec(1), dec(8000)).with_discount(dec(1000)),
            ],
            commission_percent: dec(2),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(invoice.id, "INV-003");
    assert!(invoices.is_stale());

    let summary = store.invoice_summary("INV-003").unwrap();
    assert_eq!(summary.total, dec(29000));
    assert_eq!(summary.commission_amount, dec(580));

    store
        .update_invoice(
            "INV-003",
            InvoicePatch {
                paid_total: Some(dec(9000)),
                status: Some(InvoiceStatus::Delivered),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(store.invoice_balance("INV-003").unwrap(), dec(20000));

    let balances = store.customer_balances();
    let mahmoud = balances.iter().find(|b| b.customer_id == "C003").unwrap();
    assert_eq!(mahmoud.balance, dec(20000));

    let stats = store.dashboard();
    assert_eq!(stats.invoice_count, 3);
    assert_eq!(stats.total_sales, dec(86500));
}

#[test]
fn test_export_current_receipts() {
    let store = sample_store();
    let receipts = store.get_receipts();
    let table = ExportTable::from_records(&receipts);

    assert_eq!(table.rows.len(), 2);
    let (header, body) = table.text_grid();
    assert_eq!(header[0], "الكود");
    assert_eq!(body[1][0], "R002");
    assert_eq!(body[1][3], "5000.0");
}

#[test]
fn test_seed_json_round_trip_builds_same_store() {
    let json = serde_json::to_string(&Seed::sample()).unwrap();
    let seed: Seed = serde_json::from_str(&json).unwrap();
    let store = Store::from_seed(StoreConfig::default(), seed);

    assert_eq!(store.len::<Receipt>(), 2);
    assert_eq!(store.invoice_balance("INV-001").unwrap(), dec(9000));
}
