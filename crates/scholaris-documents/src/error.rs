use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to build PDF: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write document: {0}")]
    Io(#[from] std::io::Error),
}
