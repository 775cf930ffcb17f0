use axum::extract::{Query, State};
use axum::Extension;
use serde::Deserialize;

use crate::api::BookView;
use crate::database::models::{BookParams, BookWithTags};
use crate::error::ApiError;
use crate::filter::{parse_status, BookFilter, BookSort, PageRequest};
use crate::middleware::{ApiJson, ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub tag: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

/// GET /books - the caller's books, filtered, sorted and paginated
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<BookView>> {
    let filter = BookFilter::owned_by(user.id())
        .status(parse_status(query.status.as_deref())?)
        .tagged(query.tag.as_deref());
    let sort = BookSort::parse(query.sort.as_deref(), query.order.as_deref());
    let page = PageRequest::from_params(query.page.as_deref(), query.per_page.as_deref());

    let books = state.books().list(&filter, &sort, page).await?;
    Ok(ApiResponse::page(books))
}

/// POST /books - create a book owned by the caller
pub async fn post(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ApiJson(params): ApiJson<BookParams>,
) -> ApiResult<BookView> {
    let fields = params
        .into_fields()
        .map_err(|errors| ApiError::validation("Failed to create book", errors))?;

    let book = state.books().create(user.id(), &fields).await?;
    Ok(ApiResponse::created(BookView::from(BookWithTags { book, tags: Vec::new() })))
}
