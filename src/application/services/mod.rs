//! Business logic services for the application layer.

pub mod auth_service;
pub mod category_service;
pub mod link_service;
pub mod notification_service;
pub mod user_service;

pub use auth_service::{AuthService, LoginResult};
pub use category_service::{CategoryPage, CategoryService};
pub use link_service::{LinkDraft, LinkService};
pub use notification_service::NotificationService;
pub use user_service::{ProfileChange, UserProfile, UserService};
