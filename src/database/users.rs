use chrono::Utc;
use sqlx::SqlitePool;

use super::manager::DatabaseError;
use super::models::{normalize_email, User};

/// Identity store: users and their password digests.
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Lookup by email after the same trim/lowercase applied at registration.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn create(&self, email: &str, password_digest: &str) -> Result<User, DatabaseError> {
        let now = Utc::now();
        sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_digest, created_at, updated_at) \
             VALUES (?, ?, ?, ?) RETURNING *",
        )
        .bind(normalize_email(email))
        .bind(password_digest)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if DatabaseError::is_unique_violation(&e) {
                DatabaseError::Conflict("Email has already been taken".to_string())
            } else {
                e.into()
            }
        })
    }

    /// Removes the user; books, tags and their links cascade.
    pub async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("User not found"));
        }
        Ok(())
    }
}
