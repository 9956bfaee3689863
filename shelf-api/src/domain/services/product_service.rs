use std::sync::Arc;

use crate::domain::models::product::{NewProduct, Product};
use crate::domain::repositories::product_store::StoreError;
use crate::error::{AppError, AppResult};
use crate::server::AppState;

pub const DUPLICATE_BARCODE: &str = "A product with this barcode already exists.";
pub const PRODUCT_NOT_FOUND: &str = "Product not found.";

pub struct ProductService {
    state: Arc<AppState>,
}

impl ProductService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub async fn list_products(&self) -> AppResult<Vec<Product>> {
        self.state
            .store
            .find_all()
            .await
            .map_err(storage("Server error while fetching all products."))
    }

    pub async fn get_product(&self, barcode: &str) -> AppResult<Product> {
        self.state
            .store
            .find_by_barcode(barcode)
            .await
            .map_err(storage("Server error while fetching product."))?
            .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.to_string()))
    }

    /// The pre-check only short-circuits the common case; two requests for the
    /// same barcode can both pass it, and the loser gets `DuplicateKey` from
    /// the store.
    pub async fn create_product(&self, product: NewProduct) -> AppResult<Product> {
        const FAILED: &str = "Server error while adding product.";

        // 检查条码是否已存在
        let existing = self
            .state
            .store
            .find_by_barcode(&product.barcode)
            .await
            .map_err(storage(FAILED))?;

        if existing.is_some() {
            return Err(AppError::Conflict(DUPLICATE_BARCODE.to_string()));
        }

        match self.state.store.insert(product).await {
            Ok(product) => {
                tracing::info!(barcode = %product.barcode, id = %product.id, "Product created");
                Ok(product)
            }
            Err(StoreError::DuplicateKey(barcode)) => {
                tracing::debug!(%barcode, "Lost insert race on barcode");
                Err(AppError::Conflict(DUPLICATE_BARCODE.to_string()))
            }
            Err(e) => Err(storage(FAILED)(e)),
        }
    }
}

fn storage(message: &'static str) -> impl Fn(StoreError) -> AppError {
    move |source| AppError::Storage { message, source }
}
