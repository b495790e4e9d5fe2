use crate::state::AppState;
use axum::routing::{delete, get, post, put};
use axum::Router;

mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
mod validators;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products))
        .route("/create", post(handlers::create_product))
        .route("/get_by_id/:id", get(handlers::get_product_by_id))
        .route("/update_by_id/:id", put(handlers::update_product))
        .route("/delete/:id", delete(handlers::delete_product))
}
