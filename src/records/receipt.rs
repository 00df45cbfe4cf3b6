use super::{merge, require, sealed, Entity};
use crate::error::ValidationError;
use crate::store::{Table, Tables};
use crate::types::Collection;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payment method pre-filled on the receipt form (cash).
pub const DEFAULT_PAYMENT_METHOD: &str = "نقدي";

/// A payment received against an invoice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: String,
    /// Soft reference; the store does not check that the invoice exists.
    pub invoice_id: String,
    pub customer: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub method: String,
    pub notes: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReceiptInput {
    pub invoice_id: String,
    pub customer: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub method: String,
    pub notes: String,
}

impl Default for ReceiptInput {
    fn default() -> Self {
        Self {
            invoice_id: String::new(),
            customer: String::new(),
            amount: Decimal::ZERO,
            date: Utc::now().date_naive(),
            method: DEFAULT_PAYMENT_METHOD.to_string(),
            notes: String::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReceiptPatch {
    pub invoice_id: Option<String>,
    pub customer: Option<String>,
    pub amount: Option<Decimal>,
    pub date: Option<NaiveDate>,
    pub method: Option<String>,
    pub notes: Option<String>,
}

impl sealed::Sealed for Receipt {}

impl Entity for Receipt {
    type Input = ReceiptInput;
    type Patch = ReceiptPatch;

    const COLLECTION: Collection = Collection::Receipts;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_input(id: String, input: ReceiptInput) -> Self {
        Self {
            id,
            invoice_id: input.invoice_id,
            customer: input.customer,
            amount: input.amount,
            date: input.date,
            method: input.method,
            notes: input.notes,
        }
    }

    fn apply_patch(&mut self, patch: ReceiptPatch) {
        merge(&mut self.invoice_id, patch.invoice_id);
        merge(&mut self.customer, patch.customer);
        merge(&mut self.amount, patch.amount);
        merge(&mut self.date, patch.date);
        merge(&mut self.method, patch.method);
        merge(&mut self.notes, patch.notes);
    }

    fn validate(input: &ReceiptInput) -> Result<(), ValidationError> {
        require(Self::COLLECTION, "invoiceId", &input.invoice_id)?;
        if input.amount.is_zero() {
            return Err(ValidationError::ZeroAmount);
        }
        Ok(())
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.receipts
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.receipts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_cash() {
        assert_eq!(ReceiptInput::default().method, DEFAULT_PAYMENT_METHOD);
    }

    #[test]
    fn test_validate() {
        let mut input = ReceiptInput {
            invoice_id: "INV-001".into(),
            ..Default::default()
        };
        assert_eq!(Receipt::validate(&input), Err(ValidationError::ZeroAmount));
        input.amount = Decimal::from(5000);
        assert!(Receipt::validate(&input).is_ok());
        input.invoice_id.clear();
        assert!(matches!(
            Receipt::validate(&input),
            Err(ValidationError::MissingField { field: "invoiceId", .. })
        ));
    }

    #[test]
    fn test_deserialize_partial_input() {
        let input: ReceiptInput = serde_json::from_str(
            r#"{"invoiceId": "INV-001", "amount": 5000, "date": "2025-06-20"}"#,
        )
        .unwrap();
        assert_eq!(input.amount, Decimal::from(5000));
        assert_eq!(input.date, NaiveDate::from_ymd_opt(2025, 6, 20).unwrap());
        assert_eq!(input.method, DEFAULT_PAYMENT_METHOD);
    }
}
