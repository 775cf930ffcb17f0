use axum::extract::{Path, State};
use axum::Extension;
use serde::Deserialize;
use serde_json::Value;

use super::tag_names;
use crate::api::BookTags;
use crate::handlers::parse_id;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AttachRequest {
    #[serde(default)]
    pub tags: Option<Value>,
}

/// POST /books/:id/tags - attach tags by name, creating missing ones
pub async fn post(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(book_id): Path<String>,
    ApiJson(body): ApiJson<AttachRequest>,
) -> ApiResult<BookTags> {
    let book_id = parse_id(&book_id, "Book not found")?;
    let book = state.books().find(user.id(), book_id).await?;

    let names = tag_names(body.tags);
    let attachment = state.tag_service().attach(user.id(), &book, &names).await?;

    Ok(ApiResponse::created(BookTags::new(book.id, &attachment.tags))
        .message(format!("Added {} tag(s)", attachment.added)))
}
