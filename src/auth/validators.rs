use crate::auth::dto::{LoginData, LoginRequest, RegisterData, RegisterRequest};
use crate::validation::{is_valid_email, push, FieldErrors, MIN_PASSWORD_LEN};

pub fn validate_register(req: RegisterRequest) -> Result<RegisterData, FieldErrors> {
    let mut errors = FieldErrors::new();

    let email = match req.email {
        Some(e) if is_valid_email(&e) => Some(e),
        Some(_) => {
            push(&mut errors, "email", "Invalid email format.");
            None
        }
        None => {
            push(&mut errors, "email", "Email is required.");
            None
        }
    };

    let password = match req.password {
        Some(p) if p.len() >= MIN_PASSWORD_LEN => Some(p),
        Some(_) => {
            push(
                &mut errors,
                "password",
                "Password must be at least 6 characters long.",
            );
            None
        }
        None => {
            push(&mut errors, "password", "Password is required.");
            None
        }
    };

    let role_id = match req.role_id {
        Some(id) => Some(id),
        None => {
            push(&mut errors, "role_id", "Role ID is required.");
            None
        }
    };

    match (email, password, role_id) {
        (Some(email), Some(password), Some(role_id)) if errors.is_empty() => Ok(RegisterData {
            email,
            password,
            role_id,
        }),
        _ => Err(errors),
    }
}

pub fn validate_login(req: LoginRequest) -> Result<LoginData, FieldErrors> {
    let mut errors = FieldErrors::new();

    let email = match req.email {
        Some(e) if is_valid_email(&e) => Some(e),
        Some(_) => {
            push(&mut errors, "email", "Invalid email format.");
            None
        }
        None => {
            push(&mut errors, "email", "Email is required.");
            None
        }
    };

    let password = match req.password {
        Some(p) => Some(p),
        None => {
            push(&mut errors, "password", "Password is required.");
            None
        }
    };

    match (email, password) {
        (Some(email), Some(password)) if errors.is_empty() => Ok(LoginData { email, password }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_accepts_a_valid_payload() {
        let data = validate_register(RegisterRequest {
            email: Some("user@example.com".into()),
            password: Some("hunter22".into()),
            role_id: Some(2),
        })
        .expect("valid payload");
        assert_eq!(data.email, "user@example.com");
        assert_eq!(data.role_id, 2);
    }

    #[test]
    fn register_rejects_short_password_citing_the_field() {
        let errors = validate_register(RegisterRequest {
            email: Some("user@example.com".into()),
            password: Some("five5".into()),
            role_id: Some(2),
        })
        .unwrap_err();
        assert_eq!(
            errors["password"],
            vec!["Password must be at least 6 characters long."]
        );
        assert!(!errors.contains_key("email"));
    }

    #[test]
    fn register_rejects_malformed_email_citing_the_field() {
        let errors = validate_register(RegisterRequest {
            email: Some("not-an-email".into()),
            password: Some("hunter22".into()),
            role_id: Some(2),
        })
        .unwrap_err();
        assert_eq!(errors["email"], vec!["Invalid email format."]);
    }

    #[test]
    fn register_collects_every_missing_field() {
        let errors = validate_register(RegisterRequest {
            email: None,
            password: None,
            role_id: None,
        })
        .unwrap_err();
        assert_eq!(errors["email"], vec!["Email is required."]);
        assert_eq!(errors["password"], vec!["Password is required."]);
        assert_eq!(errors["role_id"], vec!["Role ID is required."]);
    }

    #[test]
    fn login_requires_both_fields() {
        let errors = validate_login(LoginRequest {
            email: None,
            password: None,
        })
        .unwrap_err();
        assert!(errors.contains_key("email"));
        assert!(errors.contains_key("password"));
    }
}
