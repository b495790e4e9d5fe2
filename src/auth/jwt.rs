use std::time::Duration;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};

use crate::auth::repo_types::User;
use crate::http::envelope::{Envelope, Outcome};
use crate::http::timing::RequestStart;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32, // user ID
    pub exp: usize,
    pub iat: usize,
}

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        Self {
            encoding: EncodingKey::from_secret(state.config.secret_key.as_bytes()),
            decoding: DecodingKey::from_secret(state.config.secret_key.as_bytes()),
            ttl: Duration::from_secs((state.config.jwt_ttl_minutes as u64) * 60),
        }
    }
}

impl JwtKeys {
    pub fn sign(&self, user_id: i32) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> jsonwebtoken::errors::Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        debug!(user_id = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

/// Bearer-token guard for the catalog routes: decodes the JWT against the
/// server secret and resolves it to a live User row.
pub struct AuthUser(pub User);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Envelope;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let started = parts.extensions.get::<RequestStart>().copied();
        let reject = move |message: &str| {
            let envelope = Envelope::message(Outcome::Unauthorized, message);
            match started {
                Some(start) => envelope.timed(start),
                None => envelope,
            }
        };

        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| reject("Token is missing"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| reject("Token is missing"))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "bearer token rejected");
            if matches!(e.kind(), ErrorKind::ExpiredSignature) {
                reject("Token has expired")
            } else {
                reject("Invalid token")
            }
        })?;

        let user = match User::find_by_id(&state.db, claims.sub).await {
            Ok(Some(user)) => user,
            Ok(None) => return Err(reject("User not found")),
            Err(e) => {
                tracing::error!(error = %e, "user lookup failed");
                let envelope = Envelope::new(
                    Outcome::ServerError,
                    serde_json::json!({ "error": e.to_string() }),
                );
                return Err(match started {
                    Some(start) => envelope.timed(start),
                    None => envelope,
                });
            }
        };

        Ok(AuthUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys() -> JwtKeys {
        let state = AppState::fake();
        JwtKeys::from_ref(&state)
    }

    #[tokio::test]
    async fn sign_and_verify_roundtrip() {
        let keys = make_keys();
        let token = keys.sign(42).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, 42);
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn verify_rejects_wrong_secret() {
        let keys = make_keys();
        let token = keys.sign(7).expect("sign");
        let other = JwtKeys {
            encoding: EncodingKey::from_secret(b"different"),
            decoding: DecodingKey::from_secret(b"different"),
            ttl: Duration::from_secs(60),
        };
        assert!(other.verify(&token).is_err());
    }

    #[tokio::test]
    async fn verify_rejects_garbage() {
        let keys = make_keys();
        assert!(keys.verify("not.a.jwt").is_err());
    }
}
