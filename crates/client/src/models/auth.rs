//! Authentication request and response bodies.

use campus_core::roles::Role;
use campus_core::user::User;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Email address is invalid"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Email address is invalid"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 7, max = 20, message = "Phone number is invalid"))]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 4, max = 8, message = "Verification code is invalid"))]
    pub otp: Option<String>,
}

/// Body of `POST /auth/send-otp`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct SendOtpRequest {
    #[validate(length(min = 7, max = 20, message = "Phone number is invalid"))]
    pub phone: String,
}

/// Body of `POST /auth/verify-otp`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(length(min = 7, max = 20, message = "Phone number is invalid"))]
    pub phone: String,
    #[validate(length(min = 4, max = 8, message = "Verification code is invalid"))]
    pub otp: String,
}

/// Successful login or registration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Answer of `GET /auth/verify`.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResponse {
    pub user: User,
}

/// Generic `{ "message": ... }` acknowledgement.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}
