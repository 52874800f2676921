//! Invoice records kept in a single JSON file.
//!
//! The whole file is read per operation and rewritten through a temporary file
//! on every change. Intended for one process at a time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::model::{Invoice, InvoiceDraft};

/// Length of generated record ids, in hex characters.
const ID_LEN: usize = 24;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredInvoice {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub invoice: Invoice,
}

pub struct InvoiceStore {
    path: PathBuf,
}

impl InvoiceStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        InvoiceStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn create(&self, invoice: Invoice) -> Result<StoredInvoice> {
        let mut records = self.load()?;
        let now = Utc::now();
        let record = StoredInvoice {
            id: generate_id(),
            created_at: now,
            updated_at: now,
            invoice,
        };
        records.push(record.clone());
        self.save(&records)?;

        info!(id = %record.id, client = %record.invoice.client_name, "Created invoice");
        Ok(record)
    }

    /// All invoices in insertion order.
    pub fn list(&self) -> Result<Vec<StoredInvoice>> {
        self.load()
    }

    pub fn get(&self, id: &str) -> Result<StoredInvoice> {
        self.load()?
            .into_iter()
            .find(|record| record.id == id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))
    }

    /// Apply `patch` over the stored invoice and re-validate the result.
    pub fn update(&self, id: &str, patch: InvoiceDraft) -> Result<StoredInvoice> {
        let mut records = self.load()?;
        let record = records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;

        record.invoice = patch.merge_over(&record.invoice).validate()?;
        record.updated_at = Utc::now();
        let updated = record.clone();
        self.save(&records)?;

        info!(id = %updated.id, "Updated invoice");
        Ok(updated)
    }

    pub fn delete(&self, id: &str) -> Result<StoredInvoice> {
        let mut records = self.load()?;
        let idx = records
            .iter()
            .position(|record| record.id == id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;

        let removed = records.remove(idx);
        self.save(&records)?;

        info!(id = %removed.id, "Deleted invoice");
        Ok(removed)
    }

    fn load(&self) -> Result<Vec<StoredInvoice>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "Store file absent, starting empty");
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content)
            .map_err(|e| AppError::StoreError(format!("{}: {}", self.path.display(), e)))
    }

    fn save(&self, records: &[StoredInvoice]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(records)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.path)?;

        debug!(path = %self.path.display(), records = records.len(), "Saved store");
        Ok(())
    }
}

fn generate_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    hex[..ID_LEN].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LineItem;
    use rust_decimal::Decimal;
    use tempfile::tempdir;

    fn invoice(client: &str) -> Invoice {
        Invoice {
            client_name: client.to_string(),
            account_number: "ACC-1".to_string(),
            items: vec![LineItem {
                item_name: "Consulting".to_string(),
                hsn: Some("998311".to_string()),
                quantity: Decimal::from(3),
                price: Decimal::new(3333, 2),
            }],
            total_amount: Decimal::new(9999, 2),
            paid_amount: Decimal::ZERO,
            remaining_amount: Decimal::new(9999, 2),
            emi_details: Vec::new(),
        }
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = tempdir().unwrap();
        let store = InvoiceStore::open(dir.path().join("invoices.json"));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_create_get_list() {
        let dir = tempdir().unwrap();
        let store = InvoiceStore::open(dir.path().join("invoices.json"));

        let first = store.create(invoice("First")).unwrap();
        let second = store.create(invoice("Second")).unwrap();

        assert_eq!(first.id.len(), ID_LEN);
        assert!(first.id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first.id, second.id);

        let fetched = store.get(&first.id).unwrap();
        assert_eq!(fetched, first);

        let clients: Vec<String> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|r| r.invoice.client_name)
            .collect();
        assert_eq!(clients, vec!["First", "Second"]);
    }

    #[test]
    fn test_update_merges_and_touches_timestamp() {
        let dir = tempdir().unwrap();
        let store = InvoiceStore::open(dir.path().join("invoices.json"));
        let created = store.create(invoice("Before")).unwrap();

        let patch = InvoiceDraft {
            client_name: Some("After".to_string()),
            ..Default::default()
        };
        let updated = store.update(&created.id, patch).unwrap();

        assert_eq!(updated.invoice.client_name, "After");
        assert_eq!(updated.invoice.items, created.invoice.items);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(store.get(&created.id).unwrap(), updated);
    }

    #[test]
    fn test_paid_patch_keeps_balance_consistent() {
        let dir = tempdir().unwrap();
        let store = InvoiceStore::open(dir.path().join("invoices.json"));
        let created = store.create(invoice("Payer")).unwrap();

        let patch = InvoiceDraft {
            paid_amount: Some(Decimal::from(40)),
            ..Default::default()
        };
        let updated = store.update(&created.id, patch).unwrap();

        let stored = store.get(&created.id).unwrap().invoice;
        assert_eq!(stored, updated.invoice);
        assert_eq!(stored.total_amount, Decimal::new(9999, 2));
        assert_eq!(stored.remaining_amount, stored.total_amount - stored.paid_amount);
        assert_eq!(stored.remaining_amount, Decimal::new(5999, 2));
    }

    #[test]
    fn test_invalid_patch_leaves_record_unchanged() {
        let dir = tempdir().unwrap();
        let store = InvoiceStore::open(dir.path().join("invoices.json"));
        let created = store.create(invoice("Keep")).unwrap();

        let patch = InvoiceDraft {
            paid_amount: Some(Decimal::from(-1)),
            ..Default::default()
        };
        assert!(matches!(
            store.update(&created.id, patch),
            Err(AppError::MalformedInput(_))
        ));
        assert_eq!(store.get(&created.id).unwrap(), created);
    }

    #[test]
    fn test_delete() {
        let dir = tempdir().unwrap();
        let store = InvoiceStore::open(dir.path().join("invoices.json"));
        let created = store.create(invoice("Gone")).unwrap();

        let removed = store.delete(&created.id).unwrap();
        assert_eq!(removed.id, created.id);
        assert!(matches!(store.get(&created.id), Err(AppError::NotFound(_))));
        assert!(matches!(store.delete(&created.id), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let dir = tempdir().unwrap();
        let store = InvoiceStore::open(dir.path().join("invoices.json"));
        store.create(invoice("Someone")).unwrap();

        let err = store.get("000000000000000000000000").unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref id) if id == "000000000000000000000000"));
    }

    #[test]
    fn test_corrupt_file_is_store_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invoices.json");
        fs::write(&path, "{ not json").unwrap();

        let store = InvoiceStore::open(path);
        assert!(matches!(store.list(), Err(AppError::StoreError(_))));
    }

    #[test]
    fn test_records_use_camel_case_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invoices.json");
        let store = InvoiceStore::open(&path);
        store.create(invoice("Wire")).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"clientName\""));
        assert!(raw.contains("\"createdAt\""));
        assert!(raw.contains("\"remainingAmount\""));
    }
}
