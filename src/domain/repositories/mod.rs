//! Repository trait definitions for the domain layer.
//!
//! This module defines the repository interfaces (traits) that abstract data access
//! operations following the Repository pattern. These traits are implemented by
//! concrete repositories in the infrastructure layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`UserRepository`] - Accounts, subscriptions and password reset tokens
//! - [`CategoryRepository`] - Category CRUD
//! - [`LinkRepository`] - Link CRUD, click counters and popularity
//! - [`NotificationRepository`] - Failure log of the publish fan-out
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod category_repository;
pub mod link_repository;
pub mod notification_repository;
pub mod user_repository;

pub use category_repository::CategoryRepository;
pub use link_repository::LinkRepository;
pub use notification_repository::NotificationRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use category_repository::MockCategoryRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
