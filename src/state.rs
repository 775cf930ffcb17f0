use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::database::{BookRepository, TagRepository, UserRepository};
use crate::services::{AuthService, TagService};

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<AppConfig>,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: AppConfig) -> Self {
        let tokens = TokenService::from_config(&config.security);
        Self {
            pool,
            config: Arc::new(config),
            tokens,
        }
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    pub fn books(&self) -> BookRepository {
        BookRepository::new(self.pool.clone())
    }

    pub fn tags(&self) -> TagRepository {
        TagRepository::new(self.pool.clone())
    }

    pub fn tag_service(&self) -> TagService {
        TagService::new(self.tags())
    }

    pub fn auth_service(&self) -> AuthService {
        AuthService::new(self.users(), self.tokens.clone())
    }
}
