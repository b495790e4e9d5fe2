use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;

mod dto;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod reset;
mod validators;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route(
            "/request_password_reset",
            post(handlers::request_password_reset),
        )
        .route("/reset_password_form", get(handlers::reset_password_form))
        .route("/reset_password", post(handlers::reset_password))
}
