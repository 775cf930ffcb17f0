use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{TokenError, TokenService};
use crate::database::models::User;
use crate::database::UserRepository;
use crate::error::ApiError;
use crate::state::AppState;

/// The identity resolved from the request's credential. Every handler behind
/// the gate scopes its queries through this user.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn id(&self) -> i64 {
        self.0.id
    }
}

/// Why a request was turned away before reaching a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRejection {
    MissingToken,
    Expired,
    /// Bad signature, corrupt encoding or an id with no matching user.
    InvalidToken,
}

impl AuthRejection {
    pub fn message(&self) -> &'static str {
        match self {
            AuthRejection::MissingToken => "Missing authorization token",
            AuthRejection::Expired => "Token has expired",
            AuthRejection::InvalidToken => "Invalid token",
        }
    }
}

impl From<AuthRejection> for ApiError {
    fn from(rejection: AuthRejection) -> Self {
        ApiError::unauthorized(rejection.message())
    }
}

/// JWT authentication middleware: resolves the bearer token to a user and
/// injects it into the request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(&headers, &state.tokens, &state.users()).await?;
    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

pub async fn authenticate(
    headers: &HeaderMap,
    tokens: &TokenService,
    users: &UserRepository,
) -> Result<User, ApiError> {
    let token = bearer_token(headers).ok_or(AuthRejection::MissingToken)?;

    let user_id = tokens.verify(token).map_err(|e| {
        tracing::debug!("Rejected credential: {}", e);
        match e {
            TokenError::Expired => AuthRejection::Expired,
            _ => AuthRejection::InvalidToken,
        }
    })?;

    match users.find_by_id(user_id).await? {
        Some(user) => Ok(user),
        None => {
            tracing::debug!("Credential names unknown user {}", user_id);
            Err(AuthRejection::InvalidToken.into())
        }
    }
}

/// The token from an `Authorization: Bearer <token>` header. Exactly two
/// space separated parts; the scheme is matched case-insensitively.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() => {
            Some(token)
        }
        _ => None,
    }
}
