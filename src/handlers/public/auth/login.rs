// handlers/public/auth/login.rs - POST /auth/login handler

use axum::extract::State;
use serde::Deserialize;

use super::SessionView;
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /auth/login - exchange email and password for a token
pub async fn login_post(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> ApiResult<SessionView> {
    let (Some(email), Some(password)) = (body.email, body.password) else {
        return Err(ApiError::unauthorized("Invalid email or password"));
    };

    let session = state.auth_service().login(&email, &password).await?;
    Ok(ApiResponse::success(session.into()))
}
