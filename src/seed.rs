//! Sample records loaded at start-up.

use crate::records::{
    Branch, Customer, Employee, Invoice, InvoiceItem, InvoiceStatus, Product, Receipt,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Initial contents of every collection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Seed {
    pub customers: Vec<Customer>,
    pub products: Vec<Product>,
    pub invoices: Vec<Invoice>,
    pub employees: Vec<Employee>,
    pub branches: Vec<Branch>,
    pub receipts: Vec<Receipt>,
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn money(amount: i64) -> Decimal {
    Decimal::from(amount)
}

#[allow(clippy::too_many_arguments)]
fn customer(
    id: &str,
    full_name: &str,
    national_id: &str,
    phone: &str,
    address: &str,
    governorate: &str,
    job_title: &str,
    notes: &str,
) -> Customer {
    Customer {
        id: id.into(),
        full_name: full_name.into(),
        national_id: national_id.into(),
        phone: phone.into(),
        address: address.into(),
        governorate: governorate.into(),
        job_title: job_title.into(),
        notes: notes.into(),
    }
}

fn product(id: &str, name: &str, category: &str, price: i64, unit: &str) -> Product {
    Product {
        id: id.into(),
        name: name.into(),
        category: category.into(),
        default_price: money(price),
        unit: unit.into(),
        notes: String::new(),
    }
}

fn employee(id: &str, name: &str, phone: &str, branch: &str, salary: i64, role: &str) -> Employee {
    Employee {
        id: id.into(),
        name: name.into(),
        phone: phone.into(),
        branch: branch.into(),
        monthly_salary: money(salary),
        role: role.into(),
        active: true,
    }
}

fn branch(id: &str, name: &str, address: &str, rent: i64, active: bool) -> Branch {
    Branch {
        id: id.into(),
        name: name.into(),
        address: address.into(),
        rent: money(rent),
        active,
    }
}

impl Seed {
    /// No records at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The showroom's sample data set.
    pub fn sample() -> Self {
        let customers = vec![
            customer(
                "C001",
                "أحمد محمد علي",
                "29901011234567",
                "01012345678",
                "شارع التحرير",
                "القاهرة",
                "مهندس",
                "",
            ),
            customer(
                "C002",
                "سارة أحمد حسن",
                "30001021234567",
                "01098765432",
                "شارع الهرم",
                "الجيزة",
                "طبيبة",
                "عميل مميز",
            ),
            customer(
                "C003",
                "محمود حسن إبراهيم",
                "28501031234567",
                "01112345678",
                "شارع النصر",
                "الإسكندرية",
                "تاجر",
                "",
            ),
        ];

        let products = vec![
            product("P001", "غرفة نوم كاملة", "غرف نوم", 25000, "قطعة"),
            product("P002", "طقم أنتريه مودرن", "أنتريهات", 18000, "قطعة"),
            product("P003", "مطبخ ألوميتال", "مطابخ", 15000, "متر"),
            product("P004", "غرفة سفرة ٨ كراسي", "سفرة", 22000, "قطعة"),
            product("P005", "دولاب ملابس", "غرف نوم", 8000, "قطعة"),
        ];

        let invoices = vec![
            Invoice {
                id: "INV-001".into(),
                customer: "أحمد محمد علي".into(),
                branch: "القاهرة".into(),
                employee: "محمد سعيد".into(),
                date: date(2025, 6, 15),
                items: vec![InvoiceItem::new("غرفة نوم كاملة", money(1), money(25000))
                    .with_discount(money(1000))],
                status: InvoiceStatus::Confirmed,
                paid_total: money(15000),
                commission_percent: money(3),
            },
            Invoice {
                id: "INV-002".into(),
                customer: "سارة أحمد حسن".into(),
                branch: "الجيزة".into(),
                employee: "علي حسن".into(),
                date: date(2025, 6, 16),
                items: vec![
                    InvoiceItem::new("طقم أنتريه مودرن", money(1), money(18000)),
                    InvoiceItem::new("دولاب ملابس", money(2), money(8000))
                        .with_discount(money(500)),
                ],
                status: InvoiceStatus::Draft,
                paid_total: Decimal::ZERO,
                commission_percent: Decimal::new(25, 1),
            },
        ];

        let employees = vec![
            employee("E001", "محمد سعيد", "01011111111", "القاهرة", 5000, "مبيعات"),
            employee("E002", "علي حسن", "01022222222", "الجيزة", 4500, "مبيعات"),
            employee("E003", "نورا أحمد", "01033333333", "القاهرة", 6000, "محاسب"),
        ];

        let branches = vec![
            branch("B001", "فرع القاهرة", "شارع التحرير - القاهرة", 15000, true),
            branch("B002", "فرع الجيزة", "شارع الهرم - الجيزة", 12000, true),
            branch("B003", "فرع الإسكندرية", "كورنيش الإسكندرية", 10000, false),
        ];

        let receipts = vec![
            Receipt {
                id: "R001".into(),
                invoice_id: "INV-001".into(),
                customer: "أحمد محمد علي".into(),
                amount: money(10000),
                date: date(2025, 6, 15),
                method: "نقدي".into(),
                notes: String::new(),
            },
            Receipt {
                id: "R002".into(),
                invoice_id: "INV-001".into(),
                customer: "أحمد محمد علي".into(),
                amount: money(5000),
                date: date(2025, 6, 20),
                method: "تحويل بنكي".into(),
                notes: "دفعة ثانية".into(),
            },
        ];

        Self {
            customers,
            products,
            invoices,
            employees,
            branches,
            receipts,
        }
    }

    /// Total number of records across all collections.
    pub fn record_count(&self) -> usize {
        self.customers.len()
            + self.products.len()
            + self.invoices.len()
            + self.employees.len()
            + self.branches.len()
            + self.receipts.len()
    }
}
