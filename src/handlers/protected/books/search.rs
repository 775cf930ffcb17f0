use axum::extract::{Query, State};
use axum::Extension;
use serde::Deserialize;

use crate::api::BookView;
use crate::error::ApiError;
use crate::filter::PageRequest;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

/// GET /books/search?q= - case-insensitive substring match over title,
/// author and notes
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<BookView>> {
    let term = query.q.as_deref().map(str::trim).unwrap_or_default();
    if term.is_empty() {
        return Err(ApiError::bad_request("Search query required"));
    }

    let page = PageRequest::from_params(query.page.as_deref(), query.per_page.as_deref());
    let books = state.books().search(user.id(), term, page).await?;
    Ok(ApiResponse::page(books))
}
