use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::database::models::{BookStatus, BookWithTags, Tag, TagWithCount, User};

/// Public user summary. The password digest never leaves the server.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

/// Tag as embedded in a book, or listed with its usage count.
#[derive(Debug, Clone, Serialize)]
pub struct TagView {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub books_count: Option<i64>,
}

impl From<&Tag> for TagView {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name.clone(),
            created_at: tag.created_at,
            books_count: None,
        }
    }
}

impl From<&TagWithCount> for TagView {
    fn from(counted: &TagWithCount) -> Self {
        Self {
            books_count: Some(counted.books_count),
            ..TagView::from(&counted.tag)
        }
    }
}

/// `{id, name}` pair used in attach/detach responses.
#[derive(Debug, Clone, Serialize)]
pub struct TagRef {
    pub id: i64,
    pub name: String,
}

impl From<&Tag> for TagRef {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookView {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub status: BookStatus,
    pub rating: Option<i64>,
    pub notes: Option<String>,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<TagView>,
}

impl From<BookWithTags> for BookView {
    fn from(BookWithTags { book, tags }: BookWithTags) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            isbn: book.isbn,
            status: book.status,
            rating: book.rating,
            notes: book.notes,
            url: book.url,
            created_at: book.created_at,
            updated_at: book.updated_at,
            tags: tags.iter().map(TagView::from).collect(),
        }
    }
}

/// Payload of attach/detach responses.
#[derive(Debug, Clone, Serialize)]
pub struct BookTags {
    pub book_id: i64,
    pub tags: Vec<TagRef>,
}

impl BookTags {
    pub fn new(book_id: i64, tags: &[Tag]) -> Self {
        Self {
            book_id,
            tags: tags.iter().map(TagRef::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Book;
    use serde_json::json;

    fn tag(id: i64, name: &str) -> Tag {
        Tag {
            id,
            user_id: 1,
            name: name.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn user_view_hides_digest() {
        let user = User {
            id: 7,
            email: "a@x.com".to_string(),
            password_digest: "$argon2id$secret".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(UserView::from(&user)).unwrap();
        assert_eq!(value["id"], json!(7));
        assert!(value.get("password_digest").is_none());
    }

    #[test]
    fn book_view_embeds_tags_without_counts() {
        let book = Book {
            id: 3,
            user_id: 1,
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            isbn: None,
            status: BookStatus::Reading,
            rating: None,
            notes: None,
            url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let view = BookView::from(BookWithTags { book, tags: vec![tag(1, "fiction")] });
        let value = serde_json::to_value(view).unwrap();
        assert_eq!(value["status"], json!("reading"));
        assert_eq!(value["rating"], json!(null));
        assert_eq!(value["tags"][0]["name"], json!("fiction"));
        assert!(value["tags"][0].get("books_count").is_none());
        assert!(value.get("user_id").is_none());
    }

    #[test]
    fn counted_tag_carries_books_count() {
        let counted = TagWithCount { tag: tag(2, "sci-fi"), books_count: 4 };
        let value = serde_json::to_value(TagView::from(&counted)).unwrap();
        assert_eq!(value["books_count"], json!(4));
    }
}
