use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::product::{NewProduct, Product};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Duplicate key: barcode {0} already exists")]
    DuplicateKey(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence for products, keyed uniquely by barcode.
///
/// Implementations must enforce barcode uniqueness themselves and report a
/// violation from `insert` as [`StoreError::DuplicateKey`]; callers treat that
/// as the authoritative duplicate signal.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError>;

    async fn find_by_barcode(&self, barcode: &str) -> Result<Option<Product>, StoreError>;

    /// All products, earliest expiry first.
    async fn find_all(&self) -> Result<Vec<Product>, StoreError>;
}
