// invoice-pdf: Issue, track and print tax invoices with EMI schedules

pub mod config;
pub mod error;
pub mod layout;
pub mod metrics;
pub mod model;
pub mod render;
pub mod store;
pub mod words;

pub use error::{AppError, Result};
pub use layout::{DocumentLayout, Issuer};
pub use model::{
    check_id, display_number, EmiInstallment, EmiStatus, Invoice, InvoiceDraft, LineItem,
};
pub use render::{artifact_name, load_logo, InvoiceRenderer, LogoSource};
pub use store::{InvoiceStore, StoredInvoice};
pub use words::amount_in_words;
