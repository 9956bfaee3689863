use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::models::product::{NewProduct, Product};
use crate::domain::repositories::product_store::{ProductStore, StoreError};

/// In-memory store with the same uniqueness and ordering rules as MySQL.
#[derive(Default)]
pub struct MemoryProductStore {
    products: RwLock<Vec<Product>>,
}

impl MemoryProductStore {
    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        let mut products = self.products.write().await;
        if products.iter().any(|p| p.barcode == product.barcode) {
            return Err(StoreError::DuplicateKey(product.barcode));
        }

        let product = Product::new(product);
        products.push(product.clone());
        Ok(product)
    }

    async fn find_by_barcode(&self, barcode: &str) -> Result<Option<Product>, StoreError> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.barcode == barcode).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        let mut products = self.products.read().await.clone();
        products.sort_by(|a, b| {
            a.expiry_date
                .cmp(&b.expiry_date)
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(products)
    }
}
