use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::domain::models::product::{NewProduct, Product};
use crate::domain::repositories::product_store::{ProductStore, StoreError};

/// `utf8mb4_0900_bin` is a NO PAD collation: barcodes compare byte-for-byte,
/// including case and trailing spaces. 768 characters x 4 bytes is the InnoDB
/// index key limit.
const CREATE_PRODUCTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS products (
        id          BINARY(16)   NOT NULL,
        barcode     VARCHAR(768) CHARACTER SET utf8mb4 COLLATE utf8mb4_0900_bin NOT NULL,
        name        LONGTEXT     NOT NULL,
        quantity    LONGTEXT     NULL,
        expiry_date DATETIME(3)  NOT NULL,
        created_at  DATETIME(3)  NOT NULL,
        PRIMARY KEY (id),
        UNIQUE KEY uk_products_barcode (barcode),
        KEY idx_products_expiry_date (expiry_date)
    )
"#;

pub struct MySqlProductStore {
    pool: MySqlPool,
}

impl MySqlProductStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Declares the products table and its unique barcode index.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_PRODUCTS_TABLE)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl ProductStore for MySqlProductStore {
    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        let product = Product::new(product);

        sqlx::query(
            r#"
            INSERT INTO products (id, barcode, name, quantity, expiry_date, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
            .bind(product.id)
            .bind(&product.barcode)
            .bind(&product.name)
            .bind(&product.quantity)
            .bind(product.expiry_date)
            .bind(product.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    StoreError::DuplicateKey(product.barcode.clone())
                }
                e => StoreError::Database(e),
            })?;

        Ok(product)
    }

    async fn find_by_barcode(&self, barcode: &str) -> Result<Option<Product>, StoreError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, barcode, name, quantity, expiry_date, created_at
            FROM products
            WHERE barcode = ?
            "#,
        )
            .bind(barcode)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, barcode, name, quantity, expiry_date, created_at
            FROM products
            ORDER BY expiry_date ASC, created_at ASC
            "#,
        )
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }
}
