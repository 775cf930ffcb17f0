use sqlx::{QueryBuilder, Sqlite};

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::pagination::PageRequest;
use super::types::BookSort;
use crate::database::models::{normalize_tag_name, BookStatus};

const LIKE_ESCAPE: char = '\\';

/// Escape `%`, `_` and the escape character itself so user input only ever
/// matches literally inside a `LIKE ... ESCAPE '\'` pattern.
pub fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// The case folding applied to both stored search columns and search terms.
/// Unicode-aware, unlike SQLite's `LOWER()`.
pub fn fold_case(raw: &str) -> String {
    raw.to_lowercase()
}

/// Blank means no filter; anything else must name a known status.
pub fn parse_status(raw: Option<&str>) -> Result<Option<BookStatus>, FilterError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| FilterError::InvalidStatus(s.to_string())),
    }
}

/// Composable conditions over one owner's books. Every query built from it is
/// scoped by `books.user_id`.
#[derive(Debug, Clone)]
pub struct BookFilter {
    owner: i64,
    status: Option<BookStatus>,
    tag_name: Option<String>,
    tag_id: Option<i64>,
    search_pattern: Option<String>,
}

impl BookFilter {
    pub fn owned_by(owner: i64) -> Self {
        Self {
            owner,
            status: None,
            tag_name: None,
            tag_id: None,
            search_pattern: None,
        }
    }

    pub fn status(mut self, status: Option<BookStatus>) -> Self {
        self.status = status;
        self
    }

    /// Restrict to books carrying the tag with this name (normalised).
    pub fn tagged(mut self, name: Option<&str>) -> Self {
        self.tag_name = name.and_then(normalize_tag_name);
        self
    }

    pub fn tag_id(mut self, tag_id: i64) -> Self {
        self.tag_id = Some(tag_id);
        self
    }

    /// Case-insensitive substring match over title, author and notes. Callers
    /// must not pass a blank term; it would match every book.
    pub fn search(mut self, term: &str) -> Self {
        self.search_pattern = Some(format!("%{}%", escape_like(&fold_case(term))));
        self
    }

    pub fn push_where(&self, qb: &mut QueryBuilder<'static, Sqlite>) {
        qb.push(" WHERE books.user_id = ").push_bind(self.owner);

        if let Some(status) = self.status {
            qb.push(" AND books.status = ").push_bind(status);
        }

        if let Some(ref name) = self.tag_name {
            qb.push(
                " AND EXISTS (SELECT 1 FROM book_tags JOIN tags ON tags.id = book_tags.tag_id \
                 WHERE book_tags.book_id = books.id AND tags.user_id = books.user_id AND tags.name = ",
            )
            .push_bind(name.clone())
            .push(")");
        }

        if let Some(tag_id) = self.tag_id {
            qb.push(" AND EXISTS (SELECT 1 FROM book_tags WHERE book_tags.book_id = books.id AND book_tags.tag_id = ")
                .push_bind(tag_id)
                .push(")");
        }

        if let Some(ref pattern) = self.search_pattern {
            qb.push(" AND (books.title_search LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR books.author_search LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR books.notes_search LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\')");
        }
    }

    pub fn select(&self, sort: &BookSort, page: PageRequest) -> QueryBuilder<'static, Sqlite> {
        let mut qb = QueryBuilder::new("SELECT books.* FROM books");
        self.push_where(&mut qb);
        FilterOrder::push(&mut qb, sort);
        qb.push(" LIMIT ")
            .push_bind(page.per_page)
            .push(" OFFSET ")
            .push_bind(page.offset());
        qb
    }

    pub fn count(&self) -> QueryBuilder<'static, Sqlite> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) AS count FROM books");
        self.push_where(&mut qb);
        qb
    }
}
