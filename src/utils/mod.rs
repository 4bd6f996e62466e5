//! Helpers shared across the service layers.
//!
//! - [`username`] - Random username generation
//! - [`link_url`] - Canonical form of submitted link URLs
//! - [`slug`] - Category slugs
//! - [`data_url`] - Decoding of base64 image uploads
//! - [`jwt`] - Session and email-action tokens
//! - [`password`] - Argon2 password hashing

pub mod data_url;
pub mod jwt;
pub mod link_url;
pub mod password;
pub mod slug;
pub mod username;
