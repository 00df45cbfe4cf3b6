//! Tabular shaping for spreadsheet and document export.
//!
//! An [`ExportTable`] is the hand-off to the file writers: a title, a file
//! name stem, labelled columns and one keyed row per record. Writing the
//! actual `.xlsx`/`.pdf` files happens elsewhere.

use crate::records::{Branch, Customer, Employee, Invoice, Product, Receipt};
use crate::reports::{CustomerBalance, EmployeeCommission, MonthlySales, ProductRevenue, SalesRow};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

/// One record keyed by column key, in column order.
pub type Row = serde_json::Map<String, Value>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
}

impl Column {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }
}

/// A type that can be laid out as a table row.
pub trait Tabular {
    /// Heading of the exported sheet or document.
    const TITLE: &'static str;
    /// File name stem, without extension.
    const FILE_NAME: &'static str;

    fn columns() -> &'static [Column];

    fn row(&self) -> Row;
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportTable {
    pub title: String,
    pub file_name: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

impl ExportTable {
    pub fn new(title: impl Into<String>, file_name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            title: title.into(),
            file_name: file_name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Table of `records` using the type's own title and columns.
    pub fn from_records<'a, T, I>(records: I) -> Self
    where
        T: Tabular + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let mut table = Self::new(T::TITLE, T::FILE_NAME, T::columns().to_vec());
        table.rows = records.into_iter().map(Tabular::row).collect();
        table
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Rows keyed by column label; missing cells become empty strings.
    pub fn labeled_rows(&self) -> Vec<Row> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|column| {
                        let value = row
                            .get(column.key)
                            .cloned()
                            .unwrap_or_else(|| Value::String(String::new()));
                        (column.label.to_string(), value)
                    })
                    .collect()
            })
            .collect()
    }

    /// Header labels followed by every row as strings.
    pub fn text_grid(&self) -> (Vec<String>, Vec<Vec<String>>) {
        let header = self
            .columns
            .iter()
            .map(|column| column.label.to_string())
            .collect();
        let body = self
            .rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|column| row.get(column.key).map(cell_text).unwrap_or_default())
                    .collect()
            })
            .collect();
        (header, body)
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn text(s: &str) -> Value {
    Value::String(s.to_string())
}

fn amount(d: Decimal) -> Value {
    d.to_f64().map(Value::from).unwrap_or(Value::Null)
}

fn day(d: NaiveDate) -> Value {
    Value::String(d.format("%Y-%m-%d").to_string())
}

fn active_label(active: bool) -> Value {
    text(if active { "نشط" } else { "غير نشط" })
}

fn row<const N: usize>(cells: [(&str, Value); N]) -> Row {
    cells
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

impl Tabular for Customer {
    const TITLE: &'static str = "قائمة العملاء";
    const FILE_NAME: &'static str = "العملاء";

    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("id", "الكود"),
            Column::new("fullName", "الاسم"),
            Column::new("phone", "الهاتف"),
            Column::new("governorate", "المحافظة"),
            Column::new("jobTitle", "الوظيفة"),
        ];
        COLUMNS
    }

    fn row(&self) -> Row {
        row([
            ("id", text(&self.id)),
            ("fullName", text(&self.full_name)),
            ("phone", text(&self.phone)),
            ("governorate", text(&self.governorate)),
            ("jobTitle", text(&self.job_title)),
        ])
    }
}

impl Tabular for Product {
    const TITLE: &'static str = "قائمة المنتجات";
    const FILE_NAME: &'static str = "المنتجات";

    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("id", "الكود"),
            Column::new("name", "المنتج"),
            Column::new("category", "الفئة"),
            Column::new("defaultPrice", "السعر"),
            Column::new("unit", "الوحدة"),
        ];
        COLUMNS
    }

    fn row(&self) -> Row {
        row([
            ("id", text(&self.id)),
            ("name", text(&self.name)),
            ("category", text(&self.category)),
            ("defaultPrice", amount(self.default_price)),
            ("unit", text(&self.unit)),
        ])
    }
}

impl Tabular for Invoice {
    const TITLE: &'static str = "قائمة الفواتير";
    const FILE_NAME: &'static str = "الفواتير";

    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("id", "رقم الفاتورة"),
            Column::new("customer", "العميل"),
            Column::new("date", "التاريخ"),
            Column::new("total", "الإجمالي"),
            Column::new("commissionPercent", "العمولة %"),
            Column::new("commissionAmount", "مبلغ العمولة"),
            Column::new("paidTotal", "المدفوع"),
            Column::new("remaining", "المتبقي"),
            Column::new("status", "الحالة"),
        ];
        COLUMNS
    }

    fn row(&self) -> Row {
        let summary = self.summary();
        row([
            ("id", text(&self.id)),
            ("customer", text(&self.customer)),
            ("date", day(self.date)),
            ("total", amount(summary.total)),
            ("commissionPercent", amount(self.commission_percent)),
            ("commissionAmount", amount(summary.commission_amount)),
            ("paidTotal", amount(self.paid_total)),
            ("remaining", amount(summary.remaining)),
            ("status", text(self.status.label())),
        ])
    }
}

impl Tabular for Employee {
    const TITLE: &'static str = "قائمة الموظفين";
    const FILE_NAME: &'static str = "الموظفين";

    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("id", "الكود"),
            Column::new("name", "الاسم"),
            Column::new("phone", "الهاتف"),
            Column::new("branch", "الفرع"),
            Column::new("monthlySalary", "المرتب الشهري"),
            Column::new("role", "الدور"),
        ];
        COLUMNS
    }

    fn row(&self) -> Row {
        row([
            ("id", text(&self.id)),
            ("name", text(&self.name)),
            ("phone", text(&self.phone)),
            ("branch", text(&self.branch)),
            ("monthlySalary", amount(self.monthly_salary)),
            ("role", text(&self.role)),
        ])
    }
}

impl Tabular for Branch {
    const TITLE: &'static str = "قائمة الفروع";
    const FILE_NAME: &'static str = "الفروع";

    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("id", "الكود"),
            Column::new("name", "الاسم"),
            Column::new("address", "العنوان"),
            Column::new("rent", "الإيجار"),
            Column::new("active", "الحالة"),
        ];
        COLUMNS
    }

    fn row(&self) -> Row {
        row([
            ("id", text(&self.id)),
            ("name", text(&self.name)),
            ("address", text(&self.address)),
            ("rent", amount(self.rent)),
            ("active", active_label(self.active)),
        ])
    }
}

impl Tabular for Receipt {
    const TITLE: &'static str = "قائمة الإيصالات";
    const FILE_NAME: &'static str = "الإيصالات";

    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("id", "الكود"),
            Column::new("invoiceId", "رقم الفاتورة"),
            Column::new("customer", "العميل"),
            Column::new("amount", "المبلغ"),
            Column::new("date", "التاريخ"),
            Column::new("method", "طريقة الدفع"),
        ];
        COLUMNS
    }

    fn row(&self) -> Row {
        row([
            ("id", text(&self.id)),
            ("invoiceId", text(&self.invoice_id)),
            ("customer", text(&self.customer)),
            ("amount", amount(self.amount)),
            ("date", day(self.date)),
            ("method", text(&self.method)),
        ])
    }
}

impl Tabular for SalesRow {
    const TITLE: &'static str = "تقرير المبيعات";
    const FILE_NAME: &'static str = "تقرير_المبيعات";

    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("invoiceId", "الفاتورة"),
            Column::new("customer", "العميل"),
            Column::new("date", "التاريخ"),
            Column::new("total", "الإجمالي"),
            Column::new("paid", "المدفوع"),
        ];
        COLUMNS
    }

    fn row(&self) -> Row {
        row([
            ("invoiceId", text(&self.invoice_id)),
            ("customer", text(&self.customer)),
            ("date", day(self.date)),
            ("total", amount(self.total)),
            ("paid", amount(self.paid)),
        ])
    }
}

impl Tabular for CustomerBalance {
    const TITLE: &'static str = "أرصدة العملاء";
    const FILE_NAME: &'static str = "أرصدة_العملاء";

    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("customer", "العميل"),
            Column::new("total", "إجمالي الفواتير"),
            Column::new("paid", "المدفوع"),
            Column::new("balance", "الرصيد المتبقي"),
        ];
        COLUMNS
    }

    fn row(&self) -> Row {
        row([
            ("customerId", text(&self.customer_id)),
            ("customer", text(&self.customer)),
            ("total", amount(self.total)),
            ("paid", amount(self.paid)),
            ("balance", amount(self.balance)),
        ])
    }
}

impl Tabular for EmployeeCommission {
    const TITLE: &'static str = "تقرير العمولات";
    const FILE_NAME: &'static str = "العمولات";

    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("employee", "الموظف"),
            Column::new("totalSales", "إجمالي المبيعات"),
            Column::new("commissionPercent", "نسبة العمولة"),
            Column::new("commissionAmount", "مبلغ العمولة"),
        ];
        COLUMNS
    }

    fn row(&self) -> Row {
        row([
            ("employee", text(&self.employee)),
            ("invoiceCount", Value::from(self.invoice_count)),
            ("totalSales", amount(self.total_sales)),
            (
                "commissionPercent",
                self.commission_percent.map_or(Value::Null, amount),
            ),
            ("commissionAmount", amount(self.commission_amount)),
        ])
    }
}

impl Tabular for ProductRevenue {
    const TITLE: &'static str = "أكثر المنتجات مبيعاً";
    const FILE_NAME: &'static str = "أكثر_المنتجات_مبيعا";

    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("productName", "المنتج"),
            Column::new("revenue", "الإيرادات"),
        ];
        COLUMNS
    }

    fn row(&self) -> Row {
        row([
            ("productName", text(&self.product_name)),
            ("revenue", amount(self.revenue)),
        ])
    }
}

impl Tabular for MonthlySales {
    const TITLE: &'static str = "المبيعات الشهرية";
    const FILE_NAME: &'static str = "المبيعات_الشهرية";

    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("month", "الشهر"),
            Column::new("total", "المبيعات"),
        ];
        COLUMNS
    }

    fn row(&self) -> Row {
        row([("month", text(&self.month)), ("total", amount(self.total))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::Seed;

    #[test]
    fn test_employee_table_shape() {
        let seed = Seed::sample();
        let table = ExportTable::from_records(&seed.employees);

        assert_eq!(table.title, "قائمة الموظفين");
        assert_eq!(table.file_name, "الموظفين");
        assert_eq!(table.columns.len(), 6);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0]["monthlySalary"], Value::from(5000.0));
    }

    #[test]
    fn test_labeled_rows_follow_column_order() {
        let seed = Seed::sample();
        let table = ExportTable::from_records(&seed.receipts);
        let labeled = table.labeled_rows();

        let labels: Vec<&str> = labeled[0].keys().map(String::as_str).collect();
        assert_eq!(
            labels,
            vec!["الكود", "رقم الفاتورة", "العميل", "المبلغ", "التاريخ", "طريقة الدفع"]
        );
        assert_eq!(labeled[1]["طريقة الدفع"], Value::from("تحويل بنكي"));
    }

    #[test]
    fn test_missing_cells_become_empty() {
        let mut table = ExportTable::new(
            "t",
            "t",
            vec![Column::new("a", "A"), Column::new("b", "B")],
        );
        table.push(row([("a", Value::from(1))]));

        assert_eq!(table.labeled_rows()[0]["B"], Value::from(""));
        let (header, body) = table.text_grid();
        assert_eq!(header, vec!["A", "B"]);
        assert_eq!(body, vec![vec!["1".to_string(), String::new()]]);
    }

    #[test]
    fn test_invoice_row_uses_derived_amounts() {
        let seed = Seed::sample();
        let table = ExportTable::from_records(&seed.invoices);
        let (_, body) = table.text_grid();

        assert_eq!(body[0][0], "INV-001");
        assert_eq!(body[0][2], "2025-06-15");
        assert_eq!(body[0][3], "24000.0");
        assert_eq!(body[0][7], "9000.0");
        assert_eq!(body[0][8], "مؤكدة");
    }

    #[test]
    fn test_branch_status_label() {
        let seed = Seed::sample();
        let table = ExportTable::from_records(&seed.branches);
        let (_, body) = table.text_grid();
        assert_eq!(body[0][4], "نشط");
        assert_eq!(body[2][4], "غير نشط");
    }

    #[test]
    fn test_commission_percent_blank_when_mixed() {
        let row = EmployeeCommission {
            employee: "محمد سعيد".into(),
            invoice_count: 2,
            total_sales: Decimal::from(100),
            commission_percent: None,
            commission_amount: Decimal::from(4),
        };
        let table = ExportTable::from_records([&row]);
        assert_eq!(table.text_grid().1[0][2], "");
    }
}
