use axum::extract::{Path, State};
use axum::Extension;

use crate::api::BookView;
use crate::database::models::BookParams;
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;

const BOOK_NOT_FOUND: &str = "Book not found";

/// GET /books/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<BookView> {
    let id = parse_id(&id, BOOK_NOT_FOUND)?;
    let book = state.books().find_with_tags(user.id(), id).await?;
    Ok(ApiResponse::success(book.into()))
}

/// PATCH /books/:id - partial update; absent keys keep their value
pub async fn patch(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    ApiJson(params): ApiJson<BookParams>,
) -> ApiResult<BookView> {
    let id = parse_id(&id, BOOK_NOT_FOUND)?;
    let books = state.books();

    let existing = books.find(user.id(), id).await?;
    let fields = params
        .apply_to(&existing)
        .map_err(|errors| ApiError::validation("Failed to update book", errors))?;

    let updated = books.update(user.id(), id, &fields).await?;
    Ok(ApiResponse::success(books.load_tags(updated).await?.into()))
}

/// DELETE /books/:id - 204; tag links go with the book
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&id, BOOK_NOT_FOUND)?;
    state.books().delete(user.id(), id).await?;
    Ok(ApiResponse::<()>::no_content())
}
