use serde::Deserialize;

/// Request bodies use optional fields so that missing values surface as
/// collected validation messages rather than a body-level rejection.

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResetFormQuery {
    pub token: Option<String>,
}

/// Validated shapes produced by the request validators.

#[derive(Debug)]
pub struct RegisterData {
    pub email: String,
    pub password: String,
    pub role_id: i32,
}

#[derive(Debug)]
pub struct LoginData {
    pub email: String,
    pub password: String,
}
