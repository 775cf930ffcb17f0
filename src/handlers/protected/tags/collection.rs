use axum::extract::State;
use axum::Extension;

use crate::api::TagView;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;

/// GET /tags - the caller's tags by name, each with its book count
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Vec<TagView>> {
    let tags = state.tags().list_with_counts(user.id()).await?;
    Ok(ApiResponse::success(tags.iter().map(TagView::from).collect()))
}
