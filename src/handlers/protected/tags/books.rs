use axum::extract::{Path, Query, State};
use axum::Extension;
use serde::Deserialize;

use crate::api::BookView;
use crate::filter::{BookFilter, BookSort, PageRequest};
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
}

/// GET /tags/:id/books - paginated books carrying one of the caller's tags
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Vec<BookView>> {
    let id = parse_id(&id, "Tag not found")?;
    let tag = state.tags().find(user.id(), id).await?;

    let filter = BookFilter::owned_by(user.id()).tag_id(tag.id);
    let page = PageRequest::from_params(query.page.as_deref(), query.per_page.as_deref());
    let books = state.books().list(&filter, &BookSort::default(), page).await?;
    Ok(ApiResponse::page(books))
}
