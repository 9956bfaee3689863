use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use validator::Validate;

use crate::domain::models::product::{NewProduct, Product, MAX_BARCODE_CHARS};
use crate::domain::services::product_service::ProductService;
use crate::error::{AppError, AppResult};
use crate::server::AppState;

pub const REQUIRED_FIELDS: &str = "Barcode, Name, and Expiry Date are required.";
pub const INVALID_EXPIRY_DATE: &str = "Expiry Date must be a valid date.";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/{barcode}", get(get_product))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[serde(default, deserialize_with = "string_or_number")]
    #[validate(required, length(min = 1))]
    pub barcode: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub quantity: Option<String>,
    #[validate(required, length(min = 1))]
    pub expiry_date: Option<String>,
}

/// Text fields also take JSON numbers (`"barcode": 123` is stored as `"123"`).
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        String(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Text>::deserialize(deserializer)?.map(|text| match text {
        Text::String(s) => s,
        Text::Number(n) => n.to_string(),
    }))
}

impl CreateProductRequest {
    fn into_new_product(self) -> AppResult<NewProduct> {
        // 验证请求
        self.validate()
            .map_err(|_| AppError::Validation(REQUIRED_FIELDS.to_string()))?;

        let (Some(barcode), Some(name), Some(expiry_date)) =
            (self.barcode, self.name, self.expiry_date)
        else {
            return Err(AppError::Validation(REQUIRED_FIELDS.to_string()));
        };

        if barcode.chars().count() > MAX_BARCODE_CHARS {
            return Err(AppError::Validation(format!(
                "Barcode must be at most {MAX_BARCODE_CHARS} characters."
            )));
        }

        let expiry_date = parse_expiry_date(&expiry_date)
            .ok_or_else(|| AppError::Validation(INVALID_EXPIRY_DATE.to_string()))?;

        Ok(NewProduct {
            barcode,
            name,
            quantity: self.quantity,
            expiry_date,
        })
    }
}

/// Accepts RFC 3339, a naive date-time (read as UTC) or a plain date
/// (midnight UTC).
pub fn parse_expiry_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

async fn list_products(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Product>>> {
    let product_service = ProductService::new(state.clone());

    let products = product_service.list_products().await?;

    Ok(Json(products))
}

async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(barcode): Path<String>,
) -> AppResult<Json<Product>> {
    let product_service = ProductService::new(state.clone());

    let product = product_service.get_product(&barcode).await?;

    Ok(Json(product))
}

async fn create_product(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    let new_product = payload.into_new_product()?;

    let product_service = ProductService::new(state.clone());

    let product = product_service.create_product(new_product).await?;

    Ok((StatusCode::CREATED, Json(product)))
}
