use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub discount_price: Option<f64>,
    pub image_url: Option<String>,
    pub composition: Option<String>,
    pub brand_id: Option<i32>,
    pub category_id: Option<i32>,
    pub sport_id: Option<i32>,
    pub gender_id: Option<i32>,
    pub country_id: Option<i32>,
}

/// Partial update: only fields present in the payload are applied.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub discount_price: Option<f64>,
    pub image_url: Option<String>,
    pub composition: Option<String>,
    pub brand_id: Option<i32>,
    pub category_id: Option<i32>,
    pub sport_id: Option<i32>,
    pub gender_id: Option<i32>,
    pub country_id: Option<i32>,
}
