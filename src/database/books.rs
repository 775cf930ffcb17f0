use std::collections::HashMap;

use chrono::Utc;
use sqlx::{FromRow, QueryBuilder, Row, Sqlite, SqlitePool};

use super::manager::DatabaseError;
use super::models::{Book, BookFields, BookWithTags, Tag};
use crate::filter::{fold_case, BookFilter, BookSort, Page, PageMeta, PageRequest};

#[derive(FromRow)]
struct TaggedRow {
    book_id: i64,
    #[sqlx(flatten)]
    tag: Tag,
}

/// Case-folded copies of the searchable columns, kept alongside the originals.
struct SearchKeys {
    title: String,
    author: String,
    notes: String,
}

impl SearchKeys {
    fn new(title: &str, author: &str, notes: Option<&str>) -> Self {
        Self {
            title: fold_case(title),
            author: fold_case(author),
            notes: fold_case(notes.unwrap_or_default()),
        }
    }

    fn of(fields: &BookFields) -> Self {
        Self::new(&fields.title, &fields.author, fields.notes.as_deref())
    }
}

/// Collection store for books. Every lookup is scoped by the owning user.
#[derive(Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Filtered, sorted page of books plus the unpaginated total.
    pub async fn list(
        &self,
        filter: &BookFilter,
        sort: &BookSort,
        page: PageRequest,
    ) -> Result<Page<BookWithTags>, DatabaseError> {
        let mut count = filter.count();
        let total: i64 = count.build().fetch_one(&self.pool).await?.try_get("count")?;

        let mut select = filter.select(sort, page);
        let books = select.build_query_as::<Book>().fetch_all(&self.pool).await?;

        Ok(Page {
            items: self.with_tags(books).await?,
            meta: PageMeta::new(page, total),
        })
    }

    /// Substring search over title, author and notes. A blank term matches
    /// nothing.
    pub async fn search(
        &self,
        owner: i64,
        term: &str,
        page: PageRequest,
    ) -> Result<Page<BookWithTags>, DatabaseError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Page::empty(page));
        }
        let filter = BookFilter::owned_by(owner).search(term);
        self.list(&filter, &BookSort::default(), page).await
    }

    pub async fn find(&self, owner: i64, id: i64) -> Result<Book, DatabaseError> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Book not found"))
    }

    pub async fn find_by_title(&self, owner: i64, title: &str) -> Result<Option<Book>, DatabaseError> {
        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE user_id = ? AND title = ?")
            .bind(owner)
            .bind(title)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    pub async fn count(&self, owner: i64) -> Result<i64, DatabaseError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM books WHERE user_id = ?")
            .bind(owner)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("count")?)
    }

    pub async fn find_with_tags(&self, owner: i64, id: i64) -> Result<BookWithTags, DatabaseError> {
        let book = self.find(owner, id).await?;
        self.load_tags(book).await
    }

    pub async fn create(&self, owner: i64, fields: &BookFields) -> Result<Book, DatabaseError> {
        let now = Utc::now();
        let keys = SearchKeys::of(fields);
        let book = sqlx::query_as::<_, Book>(
            "INSERT INTO books (user_id, title, author, isbn, status, rating, notes, url, \
             title_search, author_search, notes_search, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(owner)
        .bind(&fields.title)
        .bind(&fields.author)
        .bind(&fields.isbn)
        .bind(fields.status)
        .bind(fields.rating)
        .bind(&fields.notes)
        .bind(&fields.url)
        .bind(keys.title)
        .bind(keys.author)
        .bind(keys.notes)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(book)
    }

    pub async fn update(&self, owner: i64, id: i64, fields: &BookFields) -> Result<Book, DatabaseError> {
        let keys = SearchKeys::of(fields);
        sqlx::query_as::<_, Book>(
            "UPDATE books SET title = ?, author = ?, isbn = ?, status = ?, rating = ?, notes = ?, url = ?, \
             title_search = ?, author_search = ?, notes_search = ?, \
             updated_at = ? WHERE id = ? AND user_id = ? RETURNING *",
        )
        .bind(&fields.title)
        .bind(&fields.author)
        .bind(&fields.isbn)
        .bind(fields.status)
        .bind(fields.rating)
        .bind(&fields.notes)
        .bind(&fields.url)
        .bind(keys.title)
        .bind(keys.author)
        .bind(keys.notes)
        .bind(Utc::now())
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Book not found"))
    }

    /// Deletes the book and, by cascade, its tag links. Tags survive.
    pub async fn delete(&self, owner: i64, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM books WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Book not found"));
        }
        Ok(())
    }

    /// Fill the folded search columns of rows written before they existed.
    /// Returns how many rows were updated.
    pub async fn backfill_search_keys(&self) -> Result<u64, DatabaseError> {
        let rows = sqlx::query("SELECT id, title, author, notes FROM books WHERE title_search IS NULL")
            .fetch_all(&self.pool)
            .await?;

        let mut updated = 0;
        for row in rows {
            let notes: Option<String> = row.try_get("notes")?;
            let keys = SearchKeys::new(row.try_get("title")?, row.try_get("author")?, notes.as_deref());
            updated += sqlx::query(
                "UPDATE books SET title_search = ?, author_search = ?, notes_search = ? WHERE id = ?",
            )
            .bind(keys.title)
            .bind(keys.author)
            .bind(keys.notes)
            .bind(row.try_get::<i64, _>("id")?)
            .execute(&self.pool)
            .await?
            .rows_affected();
        }
        Ok(updated)
    }

    pub async fn load_tags(&self, book: Book) -> Result<BookWithTags, DatabaseError> {
        let tags = self.tags_by_book(&[book.id]).await?.remove(&book.id).unwrap_or_default();
        Ok(BookWithTags { book, tags })
    }

    /// Attach each book's tags with a single query.
    pub async fn with_tags(&self, books: Vec<Book>) -> Result<Vec<BookWithTags>, DatabaseError> {
        let ids: Vec<i64> = books.iter().map(|b| b.id).collect();
        let mut tags = self.tags_by_book(&ids).await?;

        Ok(books
            .into_iter()
            .map(|book| {
                let tags = tags.remove(&book.id).unwrap_or_default();
                BookWithTags { book, tags }
            })
            .collect())
    }

    async fn tags_by_book(&self, book_ids: &[i64]) -> Result<HashMap<i64, Vec<Tag>>, DatabaseError> {
        let mut grouped: HashMap<i64, Vec<Tag>> = HashMap::new();
        if book_ids.is_empty() {
            return Ok(grouped);
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT book_tags.book_id, tags.* FROM book_tags \
             JOIN tags ON tags.id = book_tags.tag_id WHERE book_tags.book_id IN (",
        );
        let mut ids = qb.separated(", ");
        for id in book_ids {
            ids.push_bind(*id);
        }
        ids.push_unseparated(") ORDER BY tags.name");

        let rows = qb.build_query_as::<TaggedRow>().fetch_all(&self.pool).await?;
        for row in rows {
            grouped.entry(row.book_id).or_default().push(row.tag);
        }
        Ok(grouped)
    }
}
