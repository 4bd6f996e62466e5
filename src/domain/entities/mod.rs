//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without persistence logic.
//!
//! # Entity Types
//!
//! - [`User`] - A registered account, with [`PublicUser`] and [`SessionUser`] projections
//! - [`Category`] - A topic that links are filed under and users follow
//! - [`Link`] - A shared resource with a click counter
//! - [`NotificationFailure`] - A logged failure of the publish fan-out
//!
//! # Design Pattern
//!
//! Creation and mutation use separate input structs:
//! - `NewUser`, `NewCategory`, `NewLink`, `NewNotificationFailure` - For creating records
//! - `UserPatch`, `CategoryPatch`, `LinkUpdate` - For updates

pub mod category;
pub mod link;
pub mod notification;
pub mod user;

pub use category::{Category, CategoryPatch, CategoryRef, ImageRef, NewCategory};
pub use link::{ClickCount, Link, LinkType, LinkUpdate, Medium, NewLink};
pub use notification::{NewNotificationFailure, NotificationFailure};
pub use user::{Author, NewUser, PublicUser, Role, SessionUser, User, UserPatch};
