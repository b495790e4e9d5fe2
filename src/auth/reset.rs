use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// A reset token is trusted for one hour after issuance.
pub const TOKEN_TTL_SECS: i64 = 3600;

/// Claims recovered from a verified token. The nonce ties the token to a
/// single issuance: the store keeps the nonce of the latest token per user,
/// consumption clears it, so a superseded or already-used token no longer
/// matches even while its signature is still within the time window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetClaims {
    pub email: String,
    pub issued_at: i64,
    pub nonce: String,
}

/// A freshly signed token together with the state to persist alongside it.
#[derive(Debug, Clone)]
pub struct SignedToken {
    pub token: String,
    pub nonce: String,
    pub issued_at: i64,
}

/// Callers normalize both variants to one generic protocol message; the
/// distinction exists for logging only.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResetTokenError {
    #[error("malformed token or signature mismatch")]
    Invalid,
    #[error("token expired")]
    Expired,
}

/// Signs and verifies password-reset tokens.
///
/// Wire form: `base64url(email|issued_at|nonce) . base64url(hmac-sha256)`.
/// The email is recoverable from the payload, so verification needs no
/// server-side lookup table; the signature binds payload to the server
/// secret.
#[derive(Clone)]
pub struct ResetTokenSigner {
    secret: Vec<u8>,
}

impl ResetTokenSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
        }
    }

    pub fn issue(&self, email: &str) -> SignedToken {
        self.issue_at(email, OffsetDateTime::now_utc().unix_timestamp())
    }

    fn issue_at(&self, email: &str, issued_at: i64) -> SignedToken {
        let nonce = Uuid::new_v4().simple().to_string();
        let payload = format!("{email}|{issued_at}|{nonce}");
        let signature = self.mac().chain_update(payload.as_bytes()).finalize();
        let token = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(payload.as_bytes()),
            URL_SAFE_NO_PAD.encode(signature.into_bytes()),
        );
        SignedToken {
            token,
            nonce,
            issued_at,
        }
    }

    pub fn verify(&self, token: &str) -> Result<ResetClaims, ResetTokenError> {
        self.verify_at(token, OffsetDateTime::now_utc().unix_timestamp())
    }

    fn verify_at(&self, token: &str, now: i64) -> Result<ResetClaims, ResetTokenError> {
        let (payload_b64, signature_b64) = token.split_once('.').ok_or(ResetTokenError::Invalid)?;
        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| ResetTokenError::Invalid)?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| ResetTokenError::Invalid)?;

        // Constant-time comparison via the MAC itself.
        self.mac()
            .chain_update(&payload)
            .verify_slice(&signature)
            .map_err(|_| ResetTokenError::Invalid)?;

        let payload = String::from_utf8(payload).map_err(|_| ResetTokenError::Invalid)?;
        // The nonce and timestamp cannot contain '|'; the email may.
        let mut parts = payload.rsplitn(3, '|');
        let nonce = parts.next().ok_or(ResetTokenError::Invalid)?;
        let issued_at: i64 = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or(ResetTokenError::Invalid)?;
        let email = parts.next().ok_or(ResetTokenError::Invalid)?;

        if now - issued_at > TOKEN_TTL_SECS {
            return Err(ResetTokenError::Expired);
        }

        Ok(ResetClaims {
            email: email.to_string(),
            issued_at,
            nonce: nonce.to_string(),
        })
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.secret).expect("hmac accepts any key length")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> ResetTokenSigner {
        ResetTokenSigner::new("test-secret")
    }

    #[test]
    fn issue_then_verify_recovers_email() {
        let signed = signer().issue("user@example.com");
        let claims = signer().verify(&signed.token).expect("fresh token verifies");
        assert_eq!(claims.email, "user@example.com");
        assert_eq!(claims.nonce, signed.nonce);
    }

    #[test]
    fn verifies_up_to_the_ttl_boundary_and_not_past_it() {
        let signed = signer().issue_at("user@example.com", 1_000_000);
        let at_boundary = signer().verify_at(&signed.token, 1_000_000 + TOKEN_TTL_SECS);
        assert!(at_boundary.is_ok());

        let past_boundary = signer().verify_at(&signed.token, 1_000_000 + TOKEN_TTL_SECS + 1);
        assert_eq!(past_boundary.unwrap_err(), ResetTokenError::Expired);
    }

    #[test]
    fn single_character_perturbation_invalidates() {
        let signed = signer().issue("a@example.com");
        for i in 0..signed.token.len() {
            let mut bytes = signed.token.clone().into_bytes();
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let Ok(tampered) = String::from_utf8(bytes) else {
                continue;
            };
            if tampered == signed.token {
                continue;
            }
            let result = signer().verify(&tampered);
            assert_ne!(
                result.as_ref().map(|c| c.email.clone()).ok(),
                Some("b@example.com".to_string())
            );
            assert!(
                result.is_err() || result.unwrap().email == "a@example.com",
                "perturbation at {i} must not verify to a different email"
            );
        }
    }

    #[test]
    fn token_does_not_verify_under_a_different_secret() {
        let signed = signer().issue("user@example.com");
        let other = ResetTokenSigner::new("another-secret");
        assert_eq!(
            other.verify(&signed.token).unwrap_err(),
            ResetTokenError::Invalid
        );
    }

    #[test]
    fn each_issuance_gets_a_fresh_nonce() {
        let first = signer().issue("user@example.com");
        let second = signer().issue("user@example.com");
        assert_ne!(first.nonce, second.nonce);
        assert_ne!(first.token, second.token);
    }

    #[test]
    fn email_with_separator_char_roundtrips() {
        let signed = signer().issue("odd|local@example.com");
        let claims = signer().verify(&signed.token).expect("verifies");
        assert_eq!(claims.email, "odd|local@example.com");
    }

    #[test]
    fn garbage_is_invalid_not_a_panic() {
        for junk in ["", ".", "a.b", "no-dot-here", "%%%.%%%"] {
            assert_eq!(signer().verify(junk).unwrap_err(), ResetTokenError::Invalid);
        }
    }
}
