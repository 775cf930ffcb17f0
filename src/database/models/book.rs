use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use url::Url;

use super::{Tag, ValidationErrors};

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum BookStatus {
    #[default]
    Unread,
    Reading,
    Read,
}

impl BookStatus {
    pub const ALL: [BookStatus; 3] = [BookStatus::Unread, BookStatus::Reading, BookStatus::Read];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Unread => "unread",
            BookStatus::Reading => "reading",
            BookStatus::Read => "read",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl FromStr for BookStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Book {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub status: BookStatus,
    pub rating: Option<i64>,
    pub notes: Option<String>,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct BookWithTags {
    pub book: Book,
    pub tags: Vec<Tag>,
}

/// Every writable column of a book, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub status: BookStatus,
    pub rating: Option<i64>,
    pub notes: Option<String>,
    pub url: Option<String>,
}

/// A JSON scalar as a client sent it. Book attributes are coerced and checked
/// during validation, so a wrongly typed value is a field error rather than a
/// malformed body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Integer(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Integer(n) => n.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Text(s) => s,
        }
    }

    /// Whole numbers only; digit strings such as `"3"` count.
    fn as_integer(&self) -> Option<i64> {
        match self {
            Scalar::Integer(n) => Some(*n),
            Scalar::Text(s) => s.trim().parse().ok(),
            Scalar::Float(_) | Scalar::Bool(_) => None,
        }
    }
}

/// The allow-listed book attributes a client may send. Absent keys leave a
/// field untouched on update; explicit `null` clears an optional field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookParams {
    #[serde(default, deserialize_with = "nullable")]
    pub title: Option<Option<Scalar>>,
    #[serde(default, deserialize_with = "nullable")]
    pub author: Option<Option<Scalar>>,
    #[serde(default, deserialize_with = "nullable")]
    pub isbn: Option<Option<Scalar>>,
    #[serde(default)]
    pub status: Option<Scalar>,
    #[serde(default, deserialize_with = "nullable")]
    pub rating: Option<Option<Scalar>>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<Scalar>>,
    #[serde(default, deserialize_with = "nullable")]
    pub url: Option<Option<Scalar>>,
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn text(value: Option<Scalar>) -> Option<String> {
    value.map(Scalar::into_text)
}

#[derive(Debug, Default)]
struct Draft {
    title: Option<String>,
    author: Option<String>,
    isbn: Option<String>,
    status: Option<String>,
    rating: Option<Scalar>,
    notes: Option<String>,
    url: Option<String>,
}

impl From<&Book> for Draft {
    fn from(book: &Book) -> Self {
        Self {
            title: Some(book.title.clone()),
            author: Some(book.author.clone()),
            isbn: book.isbn.clone(),
            status: Some(book.status.as_str().to_string()),
            rating: book.rating.map(Scalar::Integer),
            notes: book.notes.clone(),
            url: book.url.clone(),
        }
    }
}

impl BookParams {
    /// Fields for a new book; unspecified status defaults to unread.
    pub fn into_fields(self) -> Result<BookFields, ValidationErrors> {
        self.merge_into(Draft::default())
    }

    /// Fields for `book` after applying this partial update.
    pub fn apply_to(self, book: &Book) -> Result<BookFields, ValidationErrors> {
        self.merge_into(Draft::from(book))
    }

    fn merge_into(self, mut draft: Draft) -> Result<BookFields, ValidationErrors> {
        if let Some(title) = self.title {
            draft.title = text(title);
        }
        if let Some(author) = self.author {
            draft.author = text(author);
        }
        if let Some(isbn) = self.isbn {
            draft.isbn = text(isbn);
        }
        if let Some(status) = self.status {
            draft.status = Some(status.into_text());
        }
        if let Some(rating) = self.rating {
            draft.rating = rating;
        }
        if let Some(notes) = self.notes {
            draft.notes = text(notes);
        }
        if let Some(url) = self.url {
            draft.url = text(url);
        }
        draft.validate()
    }
}

impl Draft {
    fn validate(self) -> Result<BookFields, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = present(self.title);
        if title.is_none() {
            errors.add("Title can't be blank");
        }
        let author = present(self.author);
        if author.is_none() {
            errors.add("Author can't be blank");
        }

        let status = match self.status.as_deref() {
            None => BookStatus::default(),
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                errors.add("Status is not included in the list");
                BookStatus::default()
            }),
        };

        let rating = match self.rating {
            None => None,
            Some(Scalar::Text(ref s)) if s.trim().is_empty() => None,
            Some(raw) => match raw.as_integer() {
                Some(rating) if (MIN_RATING..=MAX_RATING).contains(&rating) => Some(rating),
                Some(_) => {
                    errors.add(format!("Rating must be in {}..{}", MIN_RATING, MAX_RATING));
                    None
                }
                None => {
                    errors.add("Rating must be an integer");
                    None
                }
            },
        };

        let url = present(self.url);
        if let Some(ref url) = url {
            if !is_web_url(url) {
                errors.add("Url is invalid");
            }
        }

        errors.into_result(BookFields {
            title: title.unwrap_or_default(),
            author: author.unwrap_or_default(),
            isbn: present(self.isbn),
            status,
            rating,
            notes: present(self.notes),
            url,
        })
    }
}

/// Blank strings count as absent.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn is_web_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.has_host(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: serde_json::Value) -> BookParams {
        serde_json::from_value(value).unwrap()
    }

    fn stored_book() -> Book {
        Book {
            id: 1,
            user_id: 1,
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            isbn: None,
            status: BookStatus::Reading,
            rating: Some(4),
            notes: Some("spice".to_string()),
            url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in BookStatus::ALL {
            assert_eq!(status.as_str().parse::<BookStatus>(), Ok(status));
        }
        assert!("finished".parse::<BookStatus>().is_err());
    }

    #[test]
    fn new_book_defaults_to_unread() {
        let fields = params(json!({ "title": "Dune", "author": "Frank Herbert" }))
            .into_fields()
            .unwrap();
        assert_eq!(fields.status, BookStatus::Unread);
        assert_eq!(fields.rating, None);
    }

    #[test]
    fn missing_title_and_author_are_reported() {
        let errors = params(json!({ "title": "  " })).into_fields().unwrap_err();
        assert_eq!(
            errors.messages(),
            &["Title can't be blank".to_string(), "Author can't be blank".to_string()]
        );
    }

    #[test]
    fn rating_outside_range_is_rejected() {
        let errors = params(json!({ "title": "A", "author": "B", "rating": 6 }))
            .into_fields()
            .unwrap_err();
        assert_eq!(errors.messages(), &["Rating must be in 1..5".to_string()]);
    }

    #[test]
    fn url_must_be_http() {
        let errors = params(json!({ "title": "A", "author": "B", "url": "ftp://example.com/x" }))
            .into_fields()
            .unwrap_err();
        assert_eq!(errors.messages(), &["Url is invalid".to_string()]);

        let ok = params(json!({ "title": "A", "author": "B", "url": "https://example.com/book" }))
            .into_fields()
            .unwrap();
        assert_eq!(ok.url.as_deref(), Some("https://example.com/book"));
    }

    #[test]
    fn blank_url_is_stored_as_null() {
        let fields = params(json!({ "title": "A", "author": "B", "url": "" }))
            .into_fields()
            .unwrap();
        assert_eq!(fields.url, None);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let errors = params(json!({ "title": "A", "author": "B", "status": "finished" }))
            .into_fields()
            .unwrap_err();
        assert_eq!(errors.messages(), &["Status is not included in the list".to_string()]);
    }

    #[test]
    fn partial_update_keeps_untouched_fields() {
        let fields = params(json!({ "status": "read" })).apply_to(&stored_book()).unwrap();
        assert_eq!(fields.title, "Dune");
        assert_eq!(fields.status, BookStatus::Read);
        assert_eq!(fields.rating, Some(4));
        assert_eq!(fields.notes.as_deref(), Some("spice"));
    }

    #[test]
    fn explicit_null_clears_optional_field() {
        let fields = params(json!({ "rating": null, "notes": null }))
            .apply_to(&stored_book())
            .unwrap();
        assert_eq!(fields.rating, None);
        assert_eq!(fields.notes, None);
    }

    #[test]
    fn update_cannot_blank_required_field() {
        let errors = params(json!({ "title": null })).apply_to(&stored_book()).unwrap_err();
        assert_eq!(errors.messages(), &["Title can't be blank".to_string()]);
    }

    #[test]
    fn rating_must_be_a_whole_number() {
        for rating in [json!(4.5), json!(true), json!("four"), json!("3.5")] {
            let errors = params(json!({ "title": "A", "author": "B", "rating": rating.clone() }))
                .into_fields()
                .unwrap_err();
            assert_eq!(errors.messages(), &["Rating must be an integer".to_string()], "{rating}");
        }
    }

    #[test]
    fn digit_string_rating_is_coerced() {
        let fields = params(json!({ "title": "A", "author": "B", "rating": "3" }))
            .into_fields()
            .unwrap();
        assert_eq!(fields.rating, Some(3));

        let fields = params(json!({ "title": "A", "author": "B", "rating": " " }))
            .into_fields()
            .unwrap();
        assert_eq!(fields.rating, None);

        let errors = params(json!({ "title": "A", "author": "B", "rating": "9" }))
            .into_fields()
            .unwrap_err();
        assert_eq!(errors.messages(), &["Rating must be in 1..5".to_string()]);
    }

    #[test]
    fn scalar_text_fields_are_stringified() {
        let fields = params(json!({ "title": 1984, "author": "George Orwell", "isbn": 9780451524935i64 }))
            .into_fields()
            .unwrap();
        assert_eq!(fields.title, "1984");
        assert_eq!(fields.isbn.as_deref(), Some("9780451524935"));

        let errors = params(json!({ "title": "A", "author": "B", "status": 2 }))
            .into_fields()
            .unwrap_err();
        assert_eq!(errors.messages(), &["Status is not included in the list".to_string()]);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let fields = params(json!({ "title": "A", "author": "B", "user_id": 99, "id": 5 }))
            .into_fields()
            .unwrap();
        assert_eq!(fields.title, "A");
    }
}
