//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::auth_service::AuthService`] - Registration, login, password reset and role checks
//! - [`services::category_service::CategoryService`] - Category CRUD with image upload
//! - [`services::link_service::LinkService`] - Link CRUD, click counting and popularity
//! - [`services::user_service::UserService`] - Profile reads and updates
//! - [`services::notification_service::NotificationService`] - Subscriber email fan-out

pub mod services;
