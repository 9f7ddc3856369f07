use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Product entity - a catalog item with an inventory count.
///
/// The category is not a local entity; `category_id` references the
/// external category service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Surrogate identity key
    pub id: i32,
    /// Product name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Unit price
    pub price: Decimal,
    /// Units in stock
    pub stock: i32,
    /// Optional image reference
    pub image_url: Option<String>,
    /// Category reference in the external category service
    pub category_id: i32,
}

/// Shape returned across the HTTP boundary: the product plus the category
/// name fetched at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub image_url: Option<String>,
    pub category_id: i32,
    /// Best-effort enrichment; empty when the category lookup fails
    pub category_name: String,
}

impl ProductDto {
    pub fn from_product(product: Product, category_name: String) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            image_url: product.image_url,
            category_id: product.category_id,
            category_name,
        }
    }
}

/// Payload for create and update. Updates are a full replace of the
/// mutable fields, so both operations share this shape.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ProductInput {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(length(max = 200))]
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub image_url: Option<String>,
    pub category_id: i32,
}

/// Category payload fetched from the category service
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryDto {
    pub name: String,
}

/// Inbound order-placed event read off the queue
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlaced {
    pub order_id: i32,
    pub product_id: i32,
    pub quantity_ordered: i32,
}

/// Outbound product-changed event.
///
/// Carries the identity/price snapshot taken when the event is published.
/// The payload deliberately omits the stock level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductChanged {
    pub product_id: i32,
    pub name: String,
    pub price: Decimal,
    pub category_id: i32,
    pub date_created: DateTime<Utc>,
}

impl ProductChanged {
    /// Snapshot the event payload from the product's current state.
    pub fn snapshot(product: &Product) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            category_id: product.category_id,
            date_created: Utc::now(),
        }
    }
}
