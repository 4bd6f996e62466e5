//! Signed tokens for sessions and email actions.
//!
//! Three kinds of HS256 tokens are issued, each under its own secret:
//!
//! - session tokens (`sub` = user id), valid for 7 days
//! - registration tokens carrying the pending signup, valid for 10 minutes
//! - password reset tokens carrying the user id, valid for 10 minutes
//!
//! Email-action tokens carry an explicit [`EmailAction`] variant, so a reset
//! token can never be accepted as an activation token even if the secrets
//! were configured identically.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const SESSION_TTL: Duration = Duration::days(7);
pub const ACTIVATION_TTL: Duration = Duration::minutes(10);
pub const RESET_TTL: Duration = Duration::minutes(10);

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    Encoding(String),

    #[error("Token has expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Token carries an unexpected action")]
    WrongAction,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid(e.to_string()),
        }
    }
}

/// Registration data held in an activation token until the email is confirmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub categories: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmailAction {
    Registration { fields: PendingRegistration },
    PasswordReset { user_id: i64 },
}

#[derive(Debug, Serialize, Deserialize)]
struct ActionClaims {
    action: EmailAction,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Secrets for the three token kinds.
#[derive(Clone)]
pub struct TokenSecrets {
    pub session: String,
    pub activation: String,
    pub reset: String,
}

impl std::fmt::Debug for TokenSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenSecrets { .. }")
    }
}

/// Issues and verifies every token the service hands out.
#[derive(Clone)]
pub struct TokenSigner {
    secrets: TokenSecrets,
    validation: Validation,
}

impl TokenSigner {
    pub fn new(secrets: TokenSecrets) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.required_spec_claims = ["exp"].iter().map(|s| s.to_string()).collect();

        Self {
            secrets,
            validation,
        }
    }

    pub fn sign_session(&self, user_id: i64) -> Result<String, TokenError> {
        self.sign_session_with_ttl(user_id, SESSION_TTL)
    }

    fn sign_session_with_ttl(&self, user_id: i64, ttl: Duration) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        sign(&claims, &self.secrets.session)
    }

    /// Verifies a session token and returns the user id it was issued for.
    pub fn verify_session(&self, token: &str) -> Result<i64, TokenError> {
        let claims: SessionClaims = self.verify(token, &self.secrets.session)?;
        claims
            .sub
            .parse()
            .map_err(|_| TokenError::Invalid("subject is not a user id".to_string()))
    }

    pub fn sign_activation(&self, pending: PendingRegistration) -> Result<String, TokenError> {
        self.sign_action(
            EmailAction::Registration { fields: pending },
            &self.secrets.activation,
            ACTIVATION_TTL,
        )
    }

    pub fn verify_activation(&self, token: &str) -> Result<PendingRegistration, TokenError> {
        let claims: ActionClaims = self.verify(token, &self.secrets.activation)?;
        match claims.action {
            EmailAction::Registration { fields } => Ok(fields),
            EmailAction::PasswordReset { .. } => Err(TokenError::WrongAction),
        }
    }

    pub fn sign_reset(&self, user_id: i64) -> Result<String, TokenError> {
        self.sign_action(
            EmailAction::PasswordReset { user_id },
            &self.secrets.reset,
            RESET_TTL,
        )
    }

    /// Verifies a password reset token and returns the user id it names.
    pub fn verify_reset(&self, token: &str) -> Result<i64, TokenError> {
        let claims: ActionClaims = self.verify(token, &self.secrets.reset)?;
        match claims.action {
            EmailAction::PasswordReset { user_id } => Ok(user_id),
            EmailAction::Registration { .. } => Err(TokenError::WrongAction),
        }
    }

    fn sign_action(
        &self,
        action: EmailAction,
        secret: &str,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = ActionClaims {
            action,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        sign(&claims, secret)
    }

    fn verify<T: for<'de> Deserialize<'de>>(
        &self,
        token: &str,
        secret: &str,
    ) -> Result<T, TokenError> {
        let data = decode::<T>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &self.validation,
        )?;
        Ok(data.claims)
    }
}

fn sign<T: Serialize>(claims: &T, secret: &str) -> Result<String, TokenError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Encoding(e.to_string()))
}
