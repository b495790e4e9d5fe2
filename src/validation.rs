use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;

/// Field name → human-readable messages, collected across the whole payload.
pub type FieldErrors = BTreeMap<&'static str, Vec<String>>;

pub fn push(errors: &mut FieldErrors, field: &'static str, message: &str) {
    errors.entry(field).or_default().push(message.to_string());
}

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub const MIN_PASSWORD_LEN: usize = 6;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("user @example.com"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn push_collects_per_field() {
        let mut errors = FieldErrors::new();
        push(&mut errors, "email", "Email is required.");
        push(&mut errors, "email", "Invalid email format.");
        assert_eq!(errors["email"].len(), 2);
    }
}
