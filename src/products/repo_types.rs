use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Catalog product with its reference-table links.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub discount_price: Option<f64>,
    pub image_url: Option<String>,
    pub composition: Option<String>,
    pub brand_id: i32,
    pub category_id: i32,
    pub sport_id: i32,
    pub gender_id: i32,
    pub country_id: i32,
}

/// Validated input for product creation.
#[derive(Debug)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub discount_price: Option<f64>,
    pub image_url: Option<String>,
    pub composition: Option<String>,
    pub brand_id: i32,
    pub category_id: i32,
    pub sport_id: i32,
    pub gender_id: i32,
    pub country_id: i32,
}
