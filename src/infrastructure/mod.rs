//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer and the
//! external collaborators the services talk to.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`mail`] - Outgoing email (SMTP or in-memory outbox)
//! - [`storage`] - Object storage for category images (S3-compatible or in-memory)

pub mod mail;
pub mod persistence;
pub mod storage;
