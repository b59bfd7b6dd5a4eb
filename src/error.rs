use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Tax rate store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid tax rate: {0}")]
    InvalidTaxRate(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl CatalogError {
    /// True when the failure came from the backing store rather than the request
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            CatalogError::Database(_) | CatalogError::StoreUnavailable(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
