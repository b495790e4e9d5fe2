use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::http::timing::RequestStart;

/// Result kind carried in every wire envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Error,
    Created,
    NotFound,
    Forbidden,
    Conflict,
    ServerError,
    Unauthorized,
    UnprocessableContent,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Ok => "OK",
            Outcome::Error => "ERROR",
            Outcome::Created => "CREATED",
            Outcome::NotFound => "NOTFOUND",
            Outcome::Forbidden => "FORBIDDEN",
            Outcome::Conflict => "CONFLICT",
            Outcome::ServerError => "ERRORSERVER",
            Outcome::Unauthorized => "UNAUTHORIZED",
            Outcome::UnprocessableContent => "UNPROCESSABLECONTENT",
        }
    }

    pub fn status(self) -> StatusCode {
        match self {
            Outcome::Ok => StatusCode::OK,
            Outcome::Error => StatusCode::BAD_REQUEST,
            Outcome::Created => StatusCode::CREATED,
            Outcome::NotFound => StatusCode::NOT_FOUND,
            Outcome::Forbidden => StatusCode::FORBIDDEN,
            Outcome::Conflict => StatusCode::CONFLICT,
            Outcome::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
            Outcome::Unauthorized => StatusCode::UNAUTHORIZED,
            Outcome::UnprocessableContent => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

const DEDICATED_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second] UTC");

/// Uniform wire wrapper: `{result, data, dedicated, consumption?}`.
///
/// Timing is explicit and request-scoped: handlers hand over the
/// [`RequestStart`] they extracted, nothing is read from process globals.
#[derive(Debug)]
pub struct Envelope {
    outcome: Outcome,
    data: Value,
    started: Option<RequestStart>,
    cacheable: bool,
}

impl Envelope {
    pub fn new(outcome: Outcome, data: impl Serialize) -> Self {
        Self {
            outcome,
            data: serde_json::to_value(data).unwrap_or_else(|_| json!({})),
            started: None,
            cacheable: false,
        }
    }

    pub fn message(outcome: Outcome, text: &str) -> Self {
        Self::new(outcome, json!({ "message": text }))
    }

    pub fn timed(mut self, started: RequestStart) -> Self {
        self.started = Some(started);
        self
    }

    /// Opt a read-heavy idempotent response into long-lived caching.
    pub fn cacheable(mut self) -> Self {
        self.cacheable = true;
        self
    }

    fn body(&self) -> Value {
        let mut body = json!({
            "result": self.outcome.as_str(),
            "data": self.data,
            "dedicated": OffsetDateTime::now_utc()
                .format(DEDICATED_FORMAT)
                .unwrap_or_default(),
        });
        if let Some(started) = self.started {
            let secs = (started.elapsed_secs() * 100.0).round() / 100.0;
            body["consumption"] = json!(secs);
        }
        body
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        let cache = if self.cacheable {
            "max-age=600, public"
        } else {
            "no-store"
        };
        let mut resp = (self.outcome.status(), Json(self.body())).into_response();
        resp.headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_static(cache));
        resp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn outcome_maps_to_wire_kind_and_status() {
        let cases = [
            (Outcome::Ok, "OK", StatusCode::OK),
            (Outcome::Error, "ERROR", StatusCode::BAD_REQUEST),
            (Outcome::Created, "CREATED", StatusCode::CREATED),
            (Outcome::NotFound, "NOTFOUND", StatusCode::NOT_FOUND),
            (Outcome::Forbidden, "FORBIDDEN", StatusCode::FORBIDDEN),
            (Outcome::Conflict, "CONFLICT", StatusCode::CONFLICT),
            (
                Outcome::ServerError,
                "ERRORSERVER",
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (Outcome::Unauthorized, "UNAUTHORIZED", StatusCode::UNAUTHORIZED),
            (
                Outcome::UnprocessableContent,
                "UNPROCESSABLECONTENT",
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
        ];
        for (outcome, kind, status) in cases {
            assert_eq!(outcome.as_str(), kind);
            assert_eq!(outcome.status(), status);
        }
    }

    #[test]
    fn body_carries_result_data_and_timestamp() {
        let body = Envelope::message(Outcome::Ok, "Login successful").body();
        assert_eq!(body["result"], "OK");
        assert_eq!(body["data"]["message"], "Login successful");
        let dedicated = body["dedicated"].as_str().expect("dedicated present");
        assert!(dedicated.ends_with(" UTC"));
        assert!(body.get("consumption").is_none());
    }

    #[test]
    fn consumption_appears_only_when_timed() {
        let body = Envelope::message(Outcome::Ok, "hi")
            .timed(RequestStart(Instant::now()))
            .body();
        assert!(body["consumption"].is_number());
    }

    #[test]
    fn cache_header_follows_opt_in() {
        let resp = Envelope::message(Outcome::Ok, "hi").cacheable().into_response();
        assert_eq!(
            resp.headers().get(header::CACHE_CONTROL).unwrap(),
            "max-age=600, public"
        );

        let resp = Envelope::message(Outcome::Ok, "hi").into_response();
        assert_eq!(resp.headers().get(header::CACHE_CONTROL).unwrap(), "no-store");
    }
}
