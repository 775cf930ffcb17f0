use crate::database::models::{normalize_tag_names, Book, Tag};
use crate::database::{DatabaseError, TagRepository};

/// Outcome of attaching names to a book.
#[derive(Debug, Clone)]
pub struct Attachment {
    /// Every tag on the book afterwards, ordered by name.
    pub tags: Vec<Tag>,
    /// Links created by this call. Informational only.
    pub added: usize,
}

/// Attaches and detaches tags on books already known to belong to `owner`.
#[derive(Clone)]
pub struct TagService {
    tags: TagRepository,
}

impl TagService {
    pub fn new(tags: TagRepository) -> Self {
        Self { tags }
    }

    /// Normalise `names`, find-or-create each as one of the owner's tags and
    /// link the ones the book does not carry yet.
    pub async fn attach<S: AsRef<str>>(
        &self,
        owner: i64,
        book: &Book,
        names: &[S],
    ) -> Result<Attachment, DatabaseError> {
        debug_assert_eq!(book.user_id, owner, "book must belong to the tag owner");

        let names = normalize_tag_names(names);
        if names.is_empty() {
            return Err(DatabaseError::InvalidInput("No tags provided".to_string()));
        }

        let mut added = 0;
        for name in &names {
            let tag = self.tags.find_or_create(owner, name).await?;
            if self.tags.link(book.id, tag.id).await? {
                added += 1;
            }
        }

        Ok(Attachment {
            tags: self.tags.for_book(book.id).await?,
            added,
        })
    }

    /// Remove one link. The tag itself is kept.
    pub async fn detach(&self, book: &Book, tag_id: i64) -> Result<Vec<Tag>, DatabaseError> {
        if !self.tags.unlink(book.id, tag_id).await? {
            return Err(DatabaseError::not_found("Tag not found on this book"));
        }
        self.tags.for_book(book.id).await
    }
}
