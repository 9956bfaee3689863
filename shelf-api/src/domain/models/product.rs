use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub barcode: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    pub expiry_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Longest barcode the unique index can hold.
pub const MAX_BARCODE_CHARS: usize = 768;

/// A product that passed validation but has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub barcode: String,
    pub name: String,
    pub quantity: Option<String>,
    pub expiry_date: DateTime<Utc>,
}

impl Product {
    pub fn new(new: NewProduct) -> Self {
        // 数据库按毫秒精度存储
        Self {
            id: Uuid::new_v4(),
            barcode: new.barcode,
            name: new.name,
            quantity: new.quantity,
            expiry_date: new.expiry_date.trunc_subsecs(3),
            created_at: Utc::now().trunc_subsecs(3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn milk() -> NewProduct {
        NewProduct {
            barcode: "123".to_string(),
            name: "Milk".to_string(),
            quantity: Some("1 Litre".to_string()),
            expiry_date: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let product = Product::new(milk());
        let json = serde_json::to_value(&product).unwrap();

        assert_eq!(json["barcode"], "123");
        assert_eq!(json["quantity"], "1 Litre");
        assert_eq!(json["expiryDate"], "2025-01-01T00:00:00Z");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("expiry_date").is_none());
    }

    #[test]
    fn omits_absent_quantity() {
        let product = Product::new(NewProduct { quantity: None, ..milk() });
        let json = serde_json::to_value(&product).unwrap();

        assert!(json.get("quantity").is_none());
    }

    #[test]
    fn truncates_timestamps_to_millis() {
        let expiry = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
            + chrono::Duration::nanoseconds(1_234_567);
        let product = Product::new(NewProduct { expiry_date: expiry, ..milk() });

        assert_eq!(product.expiry_date.timestamp_subsec_nanos(), 1_000_000);
        assert_eq!(product.created_at.timestamp_subsec_nanos() % 1_000_000, 0);
    }
}
