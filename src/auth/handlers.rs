use anyhow::Context;
use axum::extract::{FromRef, Query, State};
use axum::response::Html;
use axum::Json;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, info, instrument, warn};

use crate::auth::dto::{
    LoginRequest, PasswordResetRequest, RegisterRequest, ResetFormQuery, ResetPasswordRequest,
};
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo_types::User;
use crate::auth::reset::{ResetTokenSigner, TOKEN_TTL_SECS};
use crate::auth::validators::{validate_login, validate_register};
use crate::email::{reset_email_body, RESET_SUBJECT};
use crate::http::envelope::{Envelope, Outcome};
use crate::http::error::ApiError;
use crate::http::timing::RequestStart;
use crate::state::AppState;
use crate::validation::{is_valid_email, push, FieldErrors, MIN_PASSWORD_LEN};

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    start: RequestStart,
    Json(payload): Json<RegisterRequest>,
) -> Result<Envelope, ApiError> {
    let data = match validate_register(payload) {
        Ok(data) => data,
        Err(errors) => {
            warn!(?errors, "register payload rejected");
            return Ok(Envelope::new(Outcome::UnprocessableContent, errors).timed(start));
        }
    };

    let hash = hash_password(&data.password)?;
    // A duplicate email trips the unique constraint and surfaces as a
    // server error, matching the taxonomy (Conflict stays unused).
    let user = User::create(&state.db, &data.email, &hash, data.role_id).await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Envelope::message(Outcome::Created, "User successfully registered").timed(start))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    start: RequestStart,
    Json(payload): Json<LoginRequest>,
) -> Result<Envelope, ApiError> {
    let data = match validate_login(payload) {
        Ok(data) => data,
        Err(errors) => {
            warn!(?errors, "login payload rejected");
            return Ok(Envelope::new(Outcome::UnprocessableContent, errors).timed(start));
        }
    };

    let Some(user) = User::find_by_email(&state.db, &data.email).await? else {
        warn!(email = %data.email, "login unknown email");
        return Ok(Envelope::message(Outcome::NotFound, "User not found").timed(start));
    };

    if !verify_password(&data.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Ok(Envelope::message(Outcome::Unauthorized, "Incorrect password").timed(start));
    }

    let token = JwtKeys::from_ref(&state).sign(user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok(Envelope::new(
        Outcome::Ok,
        serde_json::json!({ "message": "Login successful", "token": token }),
    )
    .timed(start))
}

#[instrument(skip(state, payload))]
pub async fn request_password_reset(
    State(state): State<AppState>,
    start: RequestStart,
    Json(payload): Json<PasswordResetRequest>,
) -> Result<Envelope, ApiError> {
    let Some(email) = payload.email else {
        return Ok(Envelope::message(Outcome::Error, "Email is required").timed(start));
    };
    if !is_valid_email(&email) {
        let mut errors = FieldErrors::new();
        push(&mut errors, "email", "Invalid email format.");
        return Ok(Envelope::new(Outcome::UnprocessableContent, errors).timed(start));
    }

    let Some(user) = User::find_by_email(&state.db, &email).await? else {
        warn!(email = %email, "password reset for unknown email");
        return Ok(Envelope::message(Outcome::NotFound, "User not found").timed(start));
    };

    // Issue: sign email + issuance time + fresh nonce, then persist token,
    // expiry and nonce in one write. Any outstanding token is superseded.
    let signed = ResetTokenSigner::new(&state.config.secret_key).issue(&user.email);
    let expiry = OffsetDateTime::from_unix_timestamp(signed.issued_at)
        .context("token issuance timestamp")?
        + TimeDuration::seconds(TOKEN_TTL_SECS);
    User::store_reset_token(&state.db, user.id, &signed.token, expiry, &signed.nonce).await?;

    // Best-effort dispatch, no retry. A failed send is logged and the
    // request still succeeds; the user can ask again.
    let reset_url = format!(
        "{}/user/reset_password_form?token={}",
        state.config.base_url, signed.token
    );
    if let Err(e) = state
        .mailer
        .send(&user.email, RESET_SUBJECT, &reset_email_body(&reset_url))
        .await
    {
        warn!(user_id = %user.id, error = %e, "reset email dispatch failed");
    }

    info!(user_id = %user.id, "reset token issued");
    Ok(Envelope::message(Outcome::Ok, "Password reset token sent to your email").timed(start))
}

#[instrument(skip(query))]
pub async fn reset_password_form(Query(query): Query<ResetFormQuery>) -> Html<String> {
    let token = query.token.unwrap_or_default();
    Html(render_reset_form(&token))
}

#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    start: RequestStart,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Envelope, ApiError> {
    let (Some(token), Some(new_password)) = (payload.token, payload.new_password) else {
        return Ok(
            Envelope::message(Outcome::Error, "Token and new password are required").timed(start),
        );
    };
    if new_password.len() < MIN_PASSWORD_LEN {
        let mut errors = FieldErrors::new();
        push(
            &mut errors,
            "new_password",
            "Password must be at least 6 characters long.",
        );
        return Ok(Envelope::new(Outcome::UnprocessableContent, errors).timed(start));
    }

    // Verify: signature plus time window. Tampered and expired tokens get
    // the same generic answer on the wire.
    let claims = match ResetTokenSigner::new(&state.config.secret_key).verify(&token) {
        Ok(claims) => claims,
        Err(e) => {
            debug!(reason = %e, "reset token rejected");
            return Ok(Envelope::message(Outcome::Error, "Invalid or expired token").timed(start));
        }
    };
    debug!(email = %claims.email, issued_at = claims.issued_at, "reset token verified");

    let Some(user) = User::find_by_email(&state.db, &claims.email).await? else {
        return Ok(Envelope::message(Outcome::NotFound, "User not found").timed(start));
    };

    // The stored nonce is the single-use latch: a consumed token was
    // cleared, a superseded token carries a stale nonce. Either way the
    // presented token no longer matches the user record even though its
    // signature still checks out. The stored mirror and expiry are honored
    // as well.
    let mirror_expired = user
        .reset_token_expiry
        .map(|exp| exp < OffsetDateTime::now_utc())
        .unwrap_or(true);
    let mirror_matches = user.reset_token.as_deref() == Some(token.as_str())
        && user.reset_nonce.as_deref() == Some(claims.nonce.as_str());
    if mirror_expired || !mirror_matches {
        debug!(user_id = %user.id, "reset token superseded, consumed or expired");
        return Ok(Envelope::message(Outcome::Error, "Invalid or expired token").timed(start));
    }

    // Consume: replace the hash and clear token state in one atomic write.
    let new_hash = hash_password(&new_password)?;
    User::reset_password(&state.db, user.id, &new_hash).await?;

    info!(user_id = %user.id, "password reset");
    Ok(Envelope::message(Outcome::Ok, "Password successfully reset").timed(start))
}

fn render_reset_form(token: &str) -> String {
    let token = escape_attr(token);
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head><title>Reset your password</title></head>\n\
         <body>\n\
         <h1>Reset your password</h1>\n\
         <form method=\"post\" action=\"/user/reset_password\">\n\
         <input type=\"hidden\" name=\"token\" value=\"{token}\" />\n\
         <label>New password <input type=\"password\" name=\"new_password\" minlength=\"6\" /></label>\n\
         <button type=\"submit\">Reset password</button>\n\
         </form>\n\
         </body>\n\
         </html>\n"
    )
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_form_embeds_the_token() {
        let html = render_reset_form("abc.def");
        assert!(html.contains("value=\"abc.def\""));
        assert!(html.contains("action=\"/user/reset_password\""));
    }

    #[test]
    fn reset_form_escapes_hostile_tokens() {
        let html = render_reset_form("\"><script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&quot;&gt;&lt;script&gt;"));
    }
}
