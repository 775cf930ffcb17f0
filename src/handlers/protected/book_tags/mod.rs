use serde_json::Value;

pub mod collection;
pub mod record;

pub use collection::post as book_tags_post;
pub use record::delete as book_tag_delete;

/// Raw names from the `tags` body field. A single string is accepted as a
/// one-element list and scalars are stringified; null entries are dropped.
pub fn tag_names(raw: Option<Value>) -> Vec<String> {
    let items = match raw {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => Vec::new(),
        Some(other) => vec![other],
    };

    items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_list_or_single_name() {
        assert_eq!(tag_names(Some(json!(["a", "b"]))), vec!["a", "b"]);
        assert_eq!(tag_names(Some(json!("solo"))), vec!["solo"]);
        assert_eq!(tag_names(Some(json!([1984, null]))), vec!["1984"]);
        assert!(tag_names(None).is_empty());
        assert!(tag_names(Some(json!({ "name": "x" }))).is_empty());
    }
}
