use chrono::Utc;
use sqlx::{Row, SqlitePool};

use super::manager::DatabaseError;
use super::models::{Tag, TagWithCount};

/// Inserts lost to a concurrent writer of the same name before giving up.
pub const FIND_OR_CREATE_ATTEMPTS: u32 = 3;

/// Tags and the book-tag association rows, scoped by owner.
#[derive(Clone)]
pub struct TagRepository {
    pool: SqlitePool,
}

impl TagRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_with_counts(&self, owner: i64) -> Result<Vec<TagWithCount>, DatabaseError> {
        let tags = sqlx::query_as::<_, TagWithCount>(
            "SELECT tags.*, COUNT(book_tags.id) AS books_count FROM tags \
             LEFT JOIN book_tags ON book_tags.tag_id = tags.id \
             WHERE tags.user_id = ? GROUP BY tags.id ORDER BY tags.name",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(tags)
    }

    pub async fn find(&self, owner: i64, id: i64) -> Result<Tag, DatabaseError> {
        sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Tag not found"))
    }

    /// `name` must already be normalised.
    pub async fn find_by_name(&self, owner: i64, name: &str) -> Result<Option<Tag>, DatabaseError> {
        let tag = sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE user_id = ? AND name = ?")
            .bind(owner)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tag)
    }

    /// Existing tag with this (normalised) name, or a new one.
    pub async fn find_or_create(&self, owner: i64, name: &str) -> Result<Tag, DatabaseError> {
        if let Some(tag) = self.find_by_name(owner, name).await? {
            return Ok(tag);
        }
        self.create_or_find(owner, name).await
    }

    /// Insert after a missed lookup. Losing the insert race to another writer
    /// returns the winner's row instead of failing.
    async fn create_or_find(&self, owner: i64, name: &str) -> Result<Tag, DatabaseError> {
        for _ in 0..FIND_OR_CREATE_ATTEMPTS {
            if let Some(tag) = self.insert(owner, name).await? {
                return Ok(tag);
            }
            if let Some(tag) = self.find_by_name(owner, name).await? {
                return Ok(tag);
            }
        }

        Err(DatabaseError::Contention {
            name: name.to_string(),
            attempts: FIND_OR_CREATE_ATTEMPTS,
        })
    }

    /// `None` when the unique index already holds the name.
    async fn insert(&self, owner: i64, name: &str) -> Result<Option<Tag>, DatabaseError> {
        let now = Utc::now();
        let inserted = sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (user_id, name, created_at, updated_at) VALUES (?, ?, ?, ?) RETURNING *",
        )
        .bind(owner)
        .bind(name)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(tag) => Ok(Some(tag)),
            Err(e) if DatabaseError::is_unique_violation(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn for_book(&self, book_id: i64) -> Result<Vec<Tag>, DatabaseError> {
        let tags = sqlx::query_as::<_, Tag>(
            "SELECT tags.* FROM tags JOIN book_tags ON book_tags.tag_id = tags.id \
             WHERE book_tags.book_id = ? ORDER BY tags.name",
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tags)
    }

    /// Returns whether a new link was created; an existing link is left as is.
    pub async fn link(&self, book_id: i64, tag_id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "INSERT INTO book_tags (book_id, tag_id, created_at) VALUES (?, ?, ?) \
             ON CONFLICT (book_id, tag_id) DO NOTHING",
        )
        .bind(book_id)
        .bind(tag_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Returns whether a link existed and was removed.
    pub async fn unlink(&self, book_id: i64, tag_id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM book_tags WHERE book_id = ? AND tag_id = ?")
            .bind(book_id)
            .bind(tag_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self, owner: i64) -> Result<i64, DatabaseError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM tags WHERE user_id = ?")
            .bind(owner)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("count")?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[tokio::test]
    async fn lost_insert_race_returns_the_winners_row() {
        let pool = testing::pool().await;
        let user = testing::user(&pool, "a@x.com").await;
        let tags = TagRepository::new(pool);

        // Another writer creates the tag after our lookup missed.
        let winner = tags.insert(user.id, "fiction").await.unwrap().unwrap();
        assert!(tags.insert(user.id, "fiction").await.unwrap().is_none());

        let resolved = tags.create_or_find(user.id, "fiction").await.unwrap();
        assert_eq!(resolved.id, winner.id);
        assert_eq!(tags.count(user.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn gives_up_when_the_conflicting_row_never_appears() {
        let pool = testing::pool().await;
        let user = testing::user(&pool, "a@x.com").await;
        // Conflicts on a case-folded name the exact-match lookup cannot see.
        sqlx::query("CREATE UNIQUE INDEX tags_folded_name ON tags (user_id, lower(name))")
            .execute(&pool)
            .await
            .unwrap();
        let tags = TagRepository::new(pool);
        tags.find_or_create(user.id, "FICTION").await.unwrap();

        let err = tags.find_or_create(user.id, "fiction").await.unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::Contention { attempts: FIND_OR_CREATE_ATTEMPTS, .. }
        ));
    }

    #[tokio::test]
    async fn link_is_idempotent() {
        let pool = testing::pool().await;
        let user = testing::user(&pool, "a@x.com").await;
        let book = testing::book(&pool, user.id, "Dune").await;
        let tags = TagRepository::new(pool);
        let tag = tags.find_or_create(user.id, "sci-fi").await.unwrap();

        assert!(tags.link(book.id, tag.id).await.unwrap());
        assert!(!tags.link(book.id, tag.id).await.unwrap());
        assert_eq!(tags.for_book(book.id).await.unwrap().len(), 1);

        assert!(tags.unlink(book.id, tag.id).await.unwrap());
        assert!(!tags.unlink(book.id, tag.id).await.unwrap());
    }
}
