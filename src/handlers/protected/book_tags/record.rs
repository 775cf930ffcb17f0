use axum::extract::{Path, State};
use axum::Extension;

use crate::api::BookTags;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;

/// DELETE /books/:id/tags/:tag_id - unlink one tag; the tag itself stays
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((book_id, tag_id)): Path<(String, String)>,
) -> ApiResult<BookTags> {
    let book_id = parse_id(&book_id, "Book not found")?;
    let book = state.books().find(user.id(), book_id).await?;

    let tag_id = parse_id(&tag_id, "Tag not found on this book")?;
    let remaining = state.tag_service().detach(&book, tag_id).await?;

    Ok(ApiResponse::success(BookTags::new(book.id, &remaining)).message("Tag removed from book"))
}
