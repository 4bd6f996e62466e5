//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod auth;
pub mod category;
pub mod health;
pub mod link;
pub mod user;

pub use auth::{
    activate_handler, forgot_password_handler, login_handler, register_handler,
    reset_password_handler,
};
pub use category::{
    create_category_handler, delete_category_handler, list_categories_handler,
    read_category_handler, read_category_page_handler, update_category_handler,
};
pub use health::health_handler;
pub use link::{
    click_count_handler, create_link_handler, delete_link_handler, list_links_handler,
    list_links_page_handler, popular_in_category_handler, popular_links_handler,
    read_link_handler, update_link_handler,
};
pub use user::{read_user_handler, update_user_handler};
