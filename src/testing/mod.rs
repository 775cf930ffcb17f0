//! Fixtures for unit tests that need a real (in-memory) database.

use chrono::Duration;
use sqlx::SqlitePool;

use crate::auth::TokenService;
use crate::database::models::{Book, BookFields, BookStatus, User};
use crate::database::{BookRepository, DatabaseManager, UserRepository};

pub async fn pool() -> SqlitePool {
    DatabaseManager::connect_in_memory()
        .await
        .expect("in-memory database")
}

pub fn tokens() -> TokenService {
    TokenService::new(b"unit-test-secret", Duration::hours(24))
}

/// A user whose digest is not a real hash; use the auth service when the
/// password matters.
pub async fn user(pool: &SqlitePool, email: &str) -> User {
    UserRepository::new(pool.clone())
        .create(email, "$argon2id$placeholder")
        .await
        .expect("create user")
}

pub async fn book(pool: &SqlitePool, owner: i64, title: &str) -> Book {
    let fields = BookFields {
        title: title.to_string(),
        author: "Anonymous".to_string(),
        isbn: None,
        status: BookStatus::Unread,
        rating: None,
        notes: None,
        url: None,
    };
    BookRepository::new(pool.clone())
        .create(owner, &fields)
        .await
        .expect("create book")
}
