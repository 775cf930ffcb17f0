// handlers/public/auth/register.rs - POST /auth/register handler

use axum::extract::State;
use serde::Deserialize;

use super::SessionView;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /auth/register - create an account and return a token for it
///
/// 201 with `{ token, user }`, or 422 "Registration failed" with every
/// validation message in `details`.
pub async fn register_post(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> ApiResult<SessionView> {
    let session = state
        .auth_service()
        .register(body.email.as_deref(), body.password.as_deref())
        .await?;

    tracing::info!("Registered user {}", session.user.id);
    Ok(ApiResponse::created(session.into()))
}
