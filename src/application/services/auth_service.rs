//! Registration, login and password reset workflows.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use crate::domain::entities::{NewUser, SessionUser, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::infrastructure::mail::{Mailer, templates};
use crate::utils::jwt::{PendingRegistration, TokenSigner};
use crate::utils::password::{self, is_acceptable_password};
use crate::utils::username::generate_username;

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub token: String,
    pub user: SessionUser,
}

/// Service for account lifecycle and session tokens.
///
/// Registration is two-phase: `register` only emails a signed activation
/// token, and the user row is created by `activate` once the token comes back.
pub struct AuthService<U: UserRepository> {
    users: Arc<U>,
    tokens: TokenSigner,
    mailer: Arc<dyn Mailer>,
    client_url: String,
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Hashes on the blocking pool; Argon2 is deliberately slow.
pub(crate) async fn hash_password(plain: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || password::hash_password(&plain))
        .await
        .map_err(|e| AppError::internal("Password hashing failed", json!({ "reason": e.to_string() })))?
        .map_err(|e| AppError::internal("Password hashing failed", json!({ "reason": e.to_string() })))
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(
        users: Arc<U>,
        tokens: TokenSigner,
        mailer: Arc<dyn Mailer>,
        client_url: String,
    ) -> Self {
        Self {
            users,
            tokens,
            mailer,
            client_url,
        }
    }

    /// Starts a registration by emailing an activation link.
    ///
    /// Returns the message shown to the client. A failed email send is not an
    /// error; it only changes the message.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    pub async fn register(&self, mut pending: PendingRegistration) -> Result<String, AppError> {
        pending.email = normalize_email(&pending.email);
        pending.name = pending.name.trim().to_string();

        if self.users.find_by_email(&pending.email).await?.is_some() {
            return Err(AppError::conflict(
                "Email is taken",
                json!({ "email": pending.email }),
            ));
        }

        let email = pending.email.clone();
        let token = self.tokens.sign_activation(pending).map_err(|e| {
            AppError::internal("Failed to sign token", json!({ "reason": e.to_string() }))
        })?;

        let message = templates::activation_email(&email, &self.client_url, &token);

        match self.mailer.send(message).await {
            Ok(()) => Ok(format!(
                "Email has been sent to {}, Follow the instructions to complete your registration",
                email
            )),
            Err(e) => {
                warn!(email = %email, error = %e, "Failed to send activation email");
                Ok("We could not verify your email. Please try again".to_string())
            }
        }
    }

    /// Creates the account described by an activation token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is invalid or expired,
    /// or if the email has been taken since the token was issued.
    /// Returns [`AppError::Validation`] if a subscribed category does not exist.
    pub async fn activate(&self, token: &str) -> Result<String, AppError> {
        let pending = self.tokens.verify_activation(token).map_err(|e| {
            AppError::unauthorized("Expired link. Try again", json!({ "reason": e.to_string() }))
        })?;

        if self.users.find_by_email(&pending.email).await?.is_some() {
            return Err(AppError::unauthorized("Email is taken", json!({})));
        }

        let password_hash = hash_password(pending.password).await?;

        let new_user = NewUser {
            username: generate_username(),
            name: pending.name,
            email: pending.email,
            password_hash,
            categories: pending.categories,
        };

        match self.users.create(new_user).await {
            Ok(user) => {
                info!(user_id = user.id, "User registered");
                Ok("Registration success. Please login.".to_string())
            }
            Err(AppError::Conflict { .. }) => {
                Err(AppError::unauthorized("Email is taken", json!({})))
            }
            Err(e) => Err(e),
        }
    }

    /// Verifies credentials and issues a session token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the user does not exist or the
    /// password does not match.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AppError> {
        let email = normalize_email(email);

        let user = self.users.find_by_email(&email).await?.ok_or_else(|| {
            AppError::bad_request(
                "User with this email does not exist. Please register.",
                json!({}),
            )
        })?;

        let matches = password::verify_password(password, &user.password_hash).unwrap_or(false);
        if !matches {
            return Err(AppError::bad_request(
                "Email and password do not match",
                json!({}),
            ));
        }

        let token = self.tokens.sign_session(user.id).map_err(|e| {
            AppError::internal("Failed to sign token", json!({ "reason": e.to_string() }))
        })?;

        Ok(LoginResult {
            token,
            user: user.to_session(),
        })
    }

    /// Stores a fresh reset token on the user and emails it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the user does not exist or the
    /// token cannot be stored.
    pub async fn forgot_password(&self, email: &str) -> Result<String, AppError> {
        let email = normalize_email(email);

        let user = self.users.find_by_email(&email).await?.ok_or_else(|| {
            AppError::bad_request("User with that email does not exist", json!({}))
        })?;

        let token = self.tokens.sign_reset(user.id).map_err(|e| {
            AppError::internal("Failed to sign token", json!({ "reason": e.to_string() }))
        })?;

        if let Err(e) = self.users.set_reset_password_link(user.id, &token).await {
            warn!(user_id = user.id, error = %e, "Failed to store reset token");
            return Err(AppError::bad_request(
                "Password reset failed. Try later.",
                json!({}),
            ));
        }

        let message = templates::password_reset_email(&email, &self.client_url, &token);

        match self.mailer.send(message).await {
            Ok(()) => Ok(format!(
                "Email has been sent to {}. Click on the link to reset your password",
                email
            )),
            Err(e) => {
                warn!(email = %email, error = %e, "Failed to send password reset email");
                Ok("We could not verify your email. Try later.".to_string())
            }
        }
    }

    /// Applies a new password for the holder of a reset token.
    ///
    /// The token is consumed by the same statement that stores the new hash,
    /// so it can be used only once.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the token is missing, expired or
    /// no longer held by any user, or if the password is too short.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<String, AppError> {
        if token.trim().is_empty() {
            return Err(AppError::bad_request(
                "Reset password link is required",
                json!({}),
            ));
        }

        if !is_acceptable_password(new_password) {
            return Err(AppError::bad_request(
                "Password must be at least 6 characters long",
                json!({}),
            ));
        }

        self.tokens.verify_reset(token).map_err(|e| {
            AppError::bad_request("Expired Link. Try again.", json!({ "reason": e.to_string() }))
        })?;

        let password_hash = hash_password(new_password.to_string()).await?;

        match self.users.reset_password(token, &password_hash).await? {
            Some(user_id) => {
                info!(user_id, "Password reset");
                Ok("Great! Now you can login with your new password".to_string())
            }
            None => Err(AppError::bad_request("Invalid token. Try again.", json!({}))),
        }
    }

    /// Resolves a session token to the user id it was issued for.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for a bad signature or an expired token.
    pub fn verify_session(&self, token: &str) -> Result<i64, AppError> {
        self.tokens.verify_session(token).map_err(|e| {
            AppError::unauthorized(
                "Invalid or expired token",
                json!({ "reason": e.to_string() }),
            )
        })
    }

    /// Loads the user behind an authenticated request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the user no longer exists.
    pub async fn load_user(&self, user_id: i64) -> Result<User, AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::bad_request("User not found", json!({})))
    }

    /// Loads the user and requires the admin role.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the user is missing or not an admin.
    pub async fn load_admin(&self, user_id: i64) -> Result<User, AppError> {
        let user = self.load_user(user_id).await?;

        if !user.is_admin() {
            return Err(AppError::bad_request(
                "Admin resource. Access denied",
                json!({}),
            ));
        }

        Ok(user)
    }
}
