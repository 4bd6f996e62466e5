//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation.

pub mod auth;
pub mod category;
pub mod health;
pub mod link;
pub mod pagination;
pub mod user;

use serde::Serialize;

/// Plain confirmation returned by workflow endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl From<String> for MessageResponse {
    fn from(message: String) -> Self {
        Self { message }
    }
}
