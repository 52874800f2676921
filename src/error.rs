use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to create PDF: {0}")]
    PdfError(String),
    #[error("Failed to load logo: {0}")]
    LogoError(String),
    #[error("Malformed invoice: {0}")]
    MalformedInput(String),
    #[error("Invoice not found: {0}")]
    NotFound(String),
    #[error("Invoice store error: {0}")]
    StoreError(String),
    #[error("Invalid date format: {0}")]
    DateError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
