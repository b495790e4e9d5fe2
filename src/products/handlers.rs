use axum::extract::{Path, State};
use axum::Json;
use tracing::{info, instrument, warn};

use crate::auth::jwt::AuthUser;
use crate::http::envelope::{Envelope, Outcome};
use crate::http::error::ApiError;
use crate::http::timing::RequestStart;
use crate::products::dto::{CreateProductRequest, UpdateProductRequest};
use crate::products::repo_types::Product;
use crate::products::validators::validate_create;
use crate::state::AppState;

#[instrument(skip(state, _user))]
pub async fn list_products(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    start: RequestStart,
) -> Result<Envelope, ApiError> {
    let products = Product::list_all(&state.db).await?;
    Ok(Envelope::new(Outcome::Ok, products).cacheable().timed(start))
}

#[instrument(skip(state, user, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    start: RequestStart,
    Json(payload): Json<CreateProductRequest>,
) -> Result<Envelope, ApiError> {
    let data = match validate_create(payload) {
        Ok(data) => data,
        Err(errors) => {
            warn!(?errors, "create product payload rejected");
            return Ok(Envelope::new(Outcome::UnprocessableContent, errors).timed(start));
        }
    };

    let product = Product::create(&state.db, &data).await?;
    info!(product_id = %product.id, by = %user.id, "product created");
    Ok(Envelope::message(Outcome::Created, "Product created successfully").timed(start))
}

#[instrument(skip(state, _user))]
pub async fn get_product_by_id(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    start: RequestStart,
    Path(product_id): Path<i32>,
) -> Result<Envelope, ApiError> {
    match Product::find_by_id(&state.db, product_id).await? {
        Some(product) => Ok(Envelope::new(Outcome::Ok, product).cacheable().timed(start)),
        None => Ok(Envelope::message(Outcome::NotFound, "Product not found").timed(start)),
    }
}

#[instrument(skip(state, user, payload))]
pub async fn update_product(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    start: RequestStart,
    Path(product_id): Path<i32>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Envelope, ApiError> {
    match Product::update(&state.db, product_id, &payload).await? {
        Some(product) => {
            info!(product_id = %product.id, by = %user.id, "product updated");
            Ok(Envelope::message(Outcome::Ok, "Product updated successfully").timed(start))
        }
        None => Ok(Envelope::message(Outcome::NotFound, "Product not found").timed(start)),
    }
}

#[instrument(skip(state, user))]
pub async fn delete_product(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    start: RequestStart,
    Path(product_id): Path<i32>,
) -> Result<Envelope, ApiError> {
    if Product::delete(&state.db, product_id).await? {
        info!(product_id = %product_id, by = %user.id, "product deleted");
        Ok(Envelope::message(Outcome::Ok, "Product deleted successfully").timed(start))
    } else {
        Ok(Envelope::message(Outcome::NotFound, "Product not found").timed(start))
    }
}
