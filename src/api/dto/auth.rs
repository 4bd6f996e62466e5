//! DTOs for registration, login and password reset.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::SessionUser;
use crate::utils::jwt::PendingRegistration;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 32, message = "Name must be between 1 and 32 characters"))]
    pub name: String,

    #[validate(
        email(message = "Must be a valid email address"),
        length(max = 254, message = "Email must be at most 254 characters")
    )]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,

    /// Categories to follow from the start.
    #[serde(default)]
    pub categories: Vec<i64>,
}

impl From<RegisterRequest> for PendingRegistration {
    fn from(req: RegisterRequest) -> Self {
        PendingRegistration {
            name: req.name,
            email: req.email,
            password: req.password,
            categories: req.categories,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ActivateRequest {
    #[validate(length(min = 1, message = "Activation token is required"))]
    pub token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Must be a valid email address"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Must be a valid email address"))]
    pub email: String,
}

/// New password for the holder of a reset token.
///
/// Both fields are checked by the service so that the error messages match
/// the reset workflow.
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[serde(default, alias = "resetPasswordLink")]
    pub reset_password_link: String,

    #[serde(default, alias = "newPassword")]
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: SessionUser,
}
