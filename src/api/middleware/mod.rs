//! HTTP middleware for request processing and protection.
//!
//! Provides session authentication, role and ownership checks, CORS and
//! observability middleware.

pub mod auth;
pub mod cors;
pub mod tracing;
