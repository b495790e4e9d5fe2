use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::http::envelope::{Envelope, Outcome};

/// Store or infrastructure failure escaping a handler. Maps to an
/// `ERRORSERVER` envelope with the raw error text in the payload.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] anyhow::Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "request failed");
        Envelope::new(Outcome::ServerError, json!({ "error": self.0.to_string() }))
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn maps_to_server_error() {
        let err = ApiError(anyhow::anyhow!("boom"));
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
