//! Domain layer containing business entities and logic.
//!
//! It defines entities, repository interfaces, and the publish event model
//! independent of infrastructure concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`link_published`] - Event emitted when a link is created
//! - [`notification_worker`] - Asynchronous fan-out worker
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - Business logic is encapsulated in services (see [`crate::application::services`])
//!
//! # Publish Notification Flow
//!
//! 1. Link handler creates the link and returns the response
//! 2. [`link_published::LinkPublished`] is offered to an async channel
//! 3. [`notification_worker::run_notification_worker`] hands events to a
//!    [`notification_worker::PublishNotifier`]
//! 4. Failed deliveries end up in [`repositories::NotificationRepository`]

pub mod entities;
pub mod link_published;
pub mod notification_worker;
pub mod repositories;
