//! Invoice records and the validation boundary for untrusted input.
//!
//! Field names on the wire follow the stored record format (`clientName`,
//! `emiDetails`, ...). Callers hand in an [`InvoiceDraft`], where every field
//! is optional, and only a validated [`Invoice`] reaches the renderer.

use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AppError, Result};

/// Number of trailing id characters shown as the invoice number.
pub const DISPLAY_NUMBER_LEN: usize = 6;

/// One purchased item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub item_name: String,
    /// HSN/SAC tax classification code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hsn: Option<String>,
    pub quantity: Decimal,
    pub price: Decimal,
}

impl LineItem {
    pub fn amount(&self) -> Decimal {
        self.quantity * self.price
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmiStatus {
    #[default]
    Pending,
    Paid,
}

impl EmiStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmiStatus::Pending => "pending",
            EmiStatus::Paid => "paid",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(EmiStatus::Pending),
            "paid" => Some(EmiStatus::Paid),
            _ => None,
        }
    }
}

impl fmt::Display for EmiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scheduled or received installment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiInstallment {
    pub amount: Decimal,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub status: EmiStatus,
}

/// A validated invoice.
///
/// The totals are carried as given. Nothing here recomputes `total_amount`
/// from the items or `remaining_amount` from the payments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub client_name: String,
    pub account_number: String,
    #[serde(default)]
    pub items: Vec<LineItem>,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub remaining_amount: Decimal,
    #[serde(default)]
    pub emi_details: Vec<EmiInstallment>,
}

/// Human-facing invoice number: the last six characters of the id, upper-cased.
pub fn display_number(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    let start = chars.len().saturating_sub(DISPLAY_NUMBER_LEN);
    chars[start..].iter().collect::<String>().to_uppercase()
}

/// Ids name output files, so only ASCII letters and digits are accepted.
pub fn check_id(id: &str) -> Result<&str> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::MalformedInput(format!(
            "id '{}' must be non-empty ASCII letters and digits",
            id
        )));
    }
    Ok(id)
}

// ============================================================================
// Drafts
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemDraft {
    pub item_name: Option<String>,
    pub hsn: Option<String>,
    pub quantity: Option<Decimal>,
    pub price: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiDraft {
    pub amount: Option<Decimal>,
    pub due_date: Option<String>,
    pub status: Option<String>,
}

/// Untrusted invoice input. Also used as a patch over a stored invoice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    pub client_name: Option<String>,
    pub account_number: Option<String>,
    pub items: Option<Vec<LineItemDraft>>,
    pub total_amount: Option<Decimal>,
    pub paid_amount: Option<Decimal>,
    pub remaining_amount: Option<Decimal>,
    pub emi_details: Option<Vec<EmiDraft>>,
}

impl InvoiceDraft {
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| AppError::MalformedInput(e.to_string()))
    }

    /// Check every field and build the typed invoice.
    ///
    /// A missing total becomes the sum of line amounts and a missing
    /// remaining amount becomes `total - paid`.
    pub fn validate(self) -> Result<Invoice> {
        let client_name = required_text(self.client_name, "clientName")?;
        let account_number = required_text(self.account_number, "accountNumber")?;

        let items = self
            .items
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(idx, item)| item.validate(idx))
            .collect::<Result<Vec<_>>>()?;

        let emi_details = self
            .emi_details
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(idx, emi)| emi.validate(idx))
            .collect::<Result<Vec<_>>>()?;

        let paid_amount = non_negative(required(self.paid_amount, "paidAmount")?, "paidAmount")?;
        let total_amount = match self.total_amount {
            Some(total) => non_negative(total, "totalAmount")?,
            None => items.iter().map(LineItem::amount).sum(),
        };
        let remaining_amount = non_negative(
            self.remaining_amount.unwrap_or(total_amount - paid_amount),
            "remainingAmount",
        )?;

        Ok(Invoice {
            client_name,
            account_number,
            items,
            total_amount,
            paid_amount,
            remaining_amount,
            emi_details,
        })
    }

    /// Fill every field this patch leaves out from `base`.
    ///
    /// Stored totals only survive while their inputs do: new items drop the
    /// old total, and any change to items, total or paid drops the old
    /// remaining amount, so [`validate`](Self::validate) derives them again.
    pub fn merge_over(self, base: &Invoice) -> InvoiceDraft {
        let base = InvoiceDraft::from(base);
        let items_changed = self.items.is_some();
        let balance_changed =
            items_changed || self.total_amount.is_some() || self.paid_amount.is_some();

        InvoiceDraft {
            client_name: self.client_name.or(base.client_name),
            account_number: self.account_number.or(base.account_number),
            items: self.items.or(base.items),
            total_amount: self
                .total_amount
                .or(if items_changed { None } else { base.total_amount }),
            paid_amount: self.paid_amount.or(base.paid_amount),
            remaining_amount: self
                .remaining_amount
                .or(if balance_changed { None } else { base.remaining_amount }),
            emi_details: self.emi_details.or(base.emi_details),
        }
    }
}

impl LineItemDraft {
    fn validate(self, idx: usize) -> Result<LineItem> {
        let field = |name: &str| format!("items[{}].{}", idx, name);
        let item_name = required(self.item_name, &field("itemName"))?;
        let item_name = printable(item_name, &field("itemName"))?;
        let quantity = non_negative(required(self.quantity, &field("quantity"))?, &field("quantity"))?;
        let price = non_negative(required(self.price, &field("price"))?, &field("price"))?;
        let hsn = self
            .hsn
            .filter(|code| !code.trim().is_empty())
            .map(|code| printable(code, &field("hsn")))
            .transpose()?;

        Ok(LineItem {
            item_name,
            hsn,
            quantity,
            price,
        })
    }
}

impl EmiDraft {
    fn validate(self, idx: usize) -> Result<EmiInstallment> {
        let field = |name: &str| format!("emiDetails[{}].{}", idx, name);
        let amount = non_negative(required(self.amount, &field("amount"))?, &field("amount"))?;
        let raw_date = required(self.due_date, &field("dueDate"))?;
        let due_date = parse_due_date(&raw_date, &field("dueDate"))?;
        let status = match self.status {
            None => EmiStatus::default(),
            Some(raw) => EmiStatus::parse(&raw).ok_or_else(|| {
                AppError::MalformedInput(format!(
                    "{}: expected 'pending' or 'paid', got '{}'",
                    field("status"),
                    raw
                ))
            })?,
        };

        Ok(EmiInstallment {
            amount,
            due_date,
            status,
        })
    }
}

impl From<&Invoice> for InvoiceDraft {
    fn from(invoice: &Invoice) -> Self {
        InvoiceDraft {
            client_name: Some(invoice.client_name.clone()),
            account_number: Some(invoice.account_number.clone()),
            items: Some(
                invoice
                    .items
                    .iter()
                    .map(|item| LineItemDraft {
                        item_name: Some(item.item_name.clone()),
                        hsn: item.hsn.clone(),
                        quantity: Some(item.quantity),
                        price: Some(item.price),
                    })
                    .collect(),
            ),
            total_amount: Some(invoice.total_amount),
            paid_amount: Some(invoice.paid_amount),
            remaining_amount: Some(invoice.remaining_amount),
            emi_details: Some(
                invoice
                    .emi_details
                    .iter()
                    .map(|emi| EmiDraft {
                        amount: Some(emi.amount),
                        due_date: Some(emi.due_date.format("%Y-%m-%d").to_string()),
                        status: Some(emi.status.as_str().to_string()),
                    })
                    .collect(),
            ),
        }
    }
}

// ============================================================================
// Field checks
// ============================================================================

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| AppError::MalformedInput(format!("{} is required", field)))
}

fn required_text(value: Option<String>, field: &str) -> Result<String> {
    let text = required(value, field)?;
    if text.trim().is_empty() {
        return Err(AppError::MalformedInput(format!("{} must not be empty", field)));
    }
    printable(text, field)
}

/// The built-in PDF fonts only cover printable ASCII.
fn printable(text: String, field: &str) -> Result<String> {
    match text.chars().find(|c| !(' '..='~').contains(c)) {
        Some(c) => Err(AppError::MalformedInput(format!(
            "{}: unsupported character {:?} (printable ASCII only)",
            field, c
        ))),
        None => Ok(text),
    }
}

fn non_negative(value: Decimal, field: &str) -> Result<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(AppError::MalformedInput(format!(
            "{} must not be negative (got {})",
            field, value
        )));
    }
    Ok(value)
}

/// Accepts a plain `YYYY-MM-DD` date or a full RFC 3339 timestamp.
fn parse_due_date(raw: &str, field: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| AppError::MalformedInput(format!("{}: invalid date '{}'", field, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft_json() -> &'static str {
        r#"{
            "clientName": "Asha Traders",
            "accountNumber": "ACC-0042",
            "items": [
                { "itemName": "Website Design", "hsn": "998314", "quantity": 2, "price": 100 },
                { "itemName": "Hosting", "hsn": "", "quantity": 1, "price": 50 }
            ],
            "paidAmount": 100,
            "emiDetails": [
                { "amount": 75, "dueDate": "2026-11-01" },
                { "amount": 75, "dueDate": "2026-12-01T00:00:00.000Z", "status": "paid" }
            ]
        }"#
    }

    #[test]
    fn test_validate_derives_missing_totals() {
        let invoice = InvoiceDraft::from_json(draft_json()).unwrap().validate().unwrap();

        assert_eq!(invoice.total_amount, Decimal::from(250));
        assert_eq!(invoice.remaining_amount, Decimal::from(150));
        assert_eq!(invoice.items[0].amount(), Decimal::from(200));
        assert_eq!(invoice.items[1].hsn, None);
    }

    #[test]
    fn test_validate_keeps_given_totals() {
        let mut draft = InvoiceDraft::from_json(draft_json()).unwrap();
        draft.total_amount = Some(Decimal::from(999));
        draft.remaining_amount = Some(Decimal::from(1));

        let invoice = draft.validate().unwrap();
        assert_eq!(invoice.total_amount, Decimal::from(999));
        assert_eq!(invoice.remaining_amount, Decimal::from(1));
    }

    #[test]
    fn test_emi_dates_and_status() {
        let invoice = InvoiceDraft::from_json(draft_json()).unwrap().validate().unwrap();

        assert_eq!(invoice.emi_details[0].status, EmiStatus::Pending);
        assert_eq!(invoice.emi_details[1].status, EmiStatus::Paid);
        assert_eq!(
            invoice.emi_details[1].due_date,
            NaiveDate::from_ymd_opt(2026, 12, 1).unwrap()
        );
    }

    #[test]
    fn test_missing_client_name_is_rejected() {
        let mut draft = InvoiceDraft::from_json(draft_json()).unwrap();
        draft.client_name = Some("   ".to_string());

        let err = draft.validate().unwrap_err();
        assert!(matches!(err, AppError::MalformedInput(ref msg) if msg.contains("clientName")));
    }

    #[test]
    fn test_missing_quantity_is_rejected() {
        let json = r#"{
            "clientName": "A", "accountNumber": "B", "paidAmount": 0,
            "items": [ { "itemName": "Widget", "price": 10 } ]
        }"#;
        let err = InvoiceDraft::from_json(json).unwrap().validate().unwrap_err();
        assert!(matches!(err, AppError::MalformedInput(ref msg) if msg.contains("items[0].quantity")));
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let json = r#"{
            "clientName": "A", "accountNumber": "B", "paidAmount": 0,
            "items": [ { "itemName": "Widget", "quantity": 1, "price": -10 } ]
        }"#;
        let err = InvoiceDraft::from_json(json).unwrap().validate().unwrap_err();
        assert!(matches!(err, AppError::MalformedInput(ref msg) if msg.contains("price")));
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let json = r#"{
            "clientName": "A", "accountNumber": "B", "paidAmount": 0,
            "emiDetails": [ { "amount": 5, "dueDate": "2026-01-01", "status": "overdue" } ]
        }"#;
        let err = InvoiceDraft::from_json(json).unwrap().validate().unwrap_err();
        assert!(matches!(err, AppError::MalformedInput(ref msg) if msg.contains("overdue")));
    }

    #[test]
    fn test_bad_due_date_is_rejected() {
        let json = r#"{
            "clientName": "A", "accountNumber": "B", "paidAmount": 0,
            "emiDetails": [ { "amount": 5, "dueDate": "" } ]
        }"#;
        let err = InvoiceDraft::from_json(json).unwrap().validate().unwrap_err();
        assert!(matches!(err, AppError::MalformedInput(ref msg) if msg.contains("dueDate")));
    }

    #[test]
    fn test_wrong_json_type_is_malformed_input() {
        let err = InvoiceDraft::from_json(r#"{ "paidAmount": "lots" }"#).unwrap_err();
        assert!(matches!(err, AppError::MalformedInput(_)));
    }

    #[test]
    fn test_patch_replaces_only_given_fields() {
        let base = InvoiceDraft::from_json(draft_json()).unwrap().validate().unwrap();
        let patch = InvoiceDraft::from_json(r#"{ "clientName": "Asha Traders Pvt Ltd" }"#).unwrap();

        let patched = patch.merge_over(&base).validate().unwrap();
        assert_eq!(patched.client_name, "Asha Traders Pvt Ltd");
        assert_eq!(patched.items, base.items);
        assert_eq!(patched.emi_details, base.emi_details);
        assert_eq!(patched.total_amount, base.total_amount);
    }

    #[test]
    fn test_patch_paid_amount_rederives_remaining() {
        let base = InvoiceDraft::from_json(draft_json()).unwrap().validate().unwrap();
        let patch = InvoiceDraft::from_json(r#"{ "paidAmount": 200 }"#).unwrap();

        let patched = patch.merge_over(&base).validate().unwrap();
        assert_eq!(patched.total_amount, Decimal::from(250));
        assert_eq!(patched.paid_amount, Decimal::from(200));
        assert_eq!(patched.remaining_amount, Decimal::from(50));
    }

    #[test]
    fn test_patch_items_rederives_total_and_remaining() {
        let base = InvoiceDraft::from_json(draft_json()).unwrap().validate().unwrap();
        let patch = InvoiceDraft::from_json(
            r#"{ "items": [ { "itemName": "Audit", "quantity": 4, "price": 100 } ] }"#,
        )
        .unwrap();

        let patched = patch.merge_over(&base).validate().unwrap();
        assert_eq!(patched.total_amount, Decimal::from(400));
        assert_eq!(patched.remaining_amount, Decimal::from(300));
    }

    #[test]
    fn test_patch_explicit_totals_win() {
        let base = InvoiceDraft::from_json(draft_json()).unwrap().validate().unwrap();
        let patch =
            InvoiceDraft::from_json(r#"{ "paidAmount": 10, "remainingAmount": 0 }"#).unwrap();

        let patched = patch.merge_over(&base).validate().unwrap();
        assert_eq!(patched.total_amount, Decimal::from(250));
        assert_eq!(patched.remaining_amount, Decimal::ZERO);
    }

    #[test]
    fn test_non_ascii_text_is_rejected() {
        let mut draft = InvoiceDraft::from_json(draft_json()).unwrap();
        draft.client_name = Some("आशा ट्रेडर्स".to_string());
        let err = draft.validate().unwrap_err();
        assert!(matches!(err, AppError::MalformedInput(ref msg) if msg.contains("clientName")));

        let json = r#"{
            "clientName": "A", "accountNumber": "B", "paidAmount": 0,
            "items": [ { "itemName": "Fee ₹", "quantity": 1, "price": 10 } ]
        }"#;
        let err = InvoiceDraft::from_json(json).unwrap().validate().unwrap_err();
        assert!(matches!(err, AppError::MalformedInput(ref msg) if msg.contains("items[0].itemName")));
    }

    #[test]
    fn test_check_id() {
        assert_eq!(check_id("64f1a2b3c4d5e6f7a8b9c0d1").unwrap(), "64f1a2b3c4d5e6f7a8b9c0d1");
        assert!(matches!(check_id("../../etc/x"), Err(AppError::MalformedInput(_))));
        assert!(matches!(check_id("a/b"), Err(AppError::MalformedInput(_))));
        assert!(matches!(check_id(""), Err(AppError::MalformedInput(_))));
    }

    #[test]
    fn test_display_number() {
        assert_eq!(display_number("64f1a2b3c4d5e6f7a8b9c0d1"), "B9C0D1");
        assert_eq!(display_number("abc"), "ABC");
        assert_eq!(display_number(""), "");
    }
}
