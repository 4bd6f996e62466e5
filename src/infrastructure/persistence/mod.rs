//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries mapped onto `FromRow` row structs.
//!
//! # Repositories
//!
//! - [`PgUserRepository`] - Accounts, subscriptions and reset tokens
//! - [`PgCategoryRepository`] - Categories with their authors
//! - [`PgLinkRepository`] - Links, click counters and popularity queries
//! - [`PgNotificationRepository`] - Notification failure log

pub mod pg_category_repository;
pub mod pg_link_repository;
pub mod pg_notification_repository;
pub mod pg_user_repository;

pub use pg_category_repository::PgCategoryRepository;
pub use pg_link_repository::PgLinkRepository;
pub use pg_notification_repository::PgNotificationRepository;
pub use pg_user_repository::PgUserRepository;
