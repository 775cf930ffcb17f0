pub mod book;
pub mod tag;
pub mod user;

pub use book::{Book, BookParams, BookFields, BookStatus, BookWithTags};
pub use tag::{normalize_tag_name, normalize_tag_names, Tag, TagWithCount};
pub use user::{normalize_email, Registration, User};

/// Human readable validation failures, collected rather than short-circuited.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{}", .0.join(", "))]
pub struct ValidationErrors(pub Vec<String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.0
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}
