//! Shared application state injected into every handler.

use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::{
    AuthService, CategoryService, LinkService, NotificationService, UserService,
};
use crate::domain::link_published::LinkPublished;
use crate::infrastructure::mail::Mailer;
use crate::infrastructure::persistence::{
    PgCategoryRepository, PgLinkRepository, PgNotificationRepository, PgUserRepository,
};
use crate::infrastructure::storage::ObjectStorage;
use crate::utils::jwt::TokenSigner;

pub type AppAuthService = AuthService<PgUserRepository>;
pub type AppUserService = UserService<PgUserRepository, PgLinkRepository>;
pub type AppCategoryService = CategoryService<PgCategoryRepository, PgLinkRepository>;
pub type AppLinkService =
    LinkService<PgLinkRepository, PgCategoryRepository, PgNotificationRepository>;
pub type AppNotificationService =
    NotificationService<PgUserRepository, PgCategoryRepository, PgNotificationRepository>;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<PgPool>,
    pub auth_service: Arc<AppAuthService>,
    pub user_service: Arc<AppUserService>,
    pub category_service: Arc<AppCategoryService>,
    pub link_service: Arc<AppLinkService>,
    pub notification_service: Arc<AppNotificationService>,
}

/// External collaborators the services are built from.
pub struct StateDeps {
    pub pool: Arc<PgPool>,
    pub tokens: TokenSigner,
    pub mailer: Arc<dyn Mailer>,
    pub storage: Arc<dyn ObjectStorage>,
    pub publisher: mpsc::Sender<LinkPublished>,
    pub client_url: String,
}

impl AppState {
    /// Wires every service against PostgreSQL repositories sharing one pool.
    pub fn new(deps: StateDeps) -> Self {
        let StateDeps {
            pool,
            tokens,
            mailer,
            storage,
            publisher,
            client_url,
        } = deps;

        let users = Arc::new(PgUserRepository::new(pool.clone()));
        let categories = Arc::new(PgCategoryRepository::new(pool.clone()));
        let links = Arc::new(PgLinkRepository::new(pool.clone()));
        let failures = Arc::new(PgNotificationRepository::new(pool.clone()));

        let auth_service = Arc::new(AuthService::new(
            users.clone(),
            tokens,
            mailer.clone(),
            client_url.clone(),
        ));
        let user_service = Arc::new(UserService::new(users.clone(), links.clone()));
        let category_service = Arc::new(CategoryService::new(
            categories.clone(),
            links.clone(),
            storage,
        ));
        let link_service = Arc::new(LinkService::new(
            links,
            categories.clone(),
            failures.clone(),
            publisher,
        ));
        let notification_service = Arc::new(NotificationService::new(
            users, categories, failures, mailer, client_url,
        ));

        Self {
            db: pool,
            auth_service,
            user_service,
            category_service,
            link_service,
            notification_service,
        }
    }
}
