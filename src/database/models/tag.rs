use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Tag {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct TagWithCount {
    #[sqlx(flatten)]
    pub tag: Tag,
    pub books_count: i64,
}

/// Canonical form of a tag name: trimmed and lowercased. Blank names have
/// no canonical form.
pub fn normalize_tag_name(raw: &str) -> Option<String> {
    let name = raw.trim().to_lowercase();
    (!name.is_empty()).then_some(name)
}

/// Canonical, de-duplicated names in first-seen order.
pub fn normalize_tag_names<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(raw.len());
    for name in raw.iter().filter_map(|r| normalize_tag_name(r.as_ref())) {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}
