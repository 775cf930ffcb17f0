use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::filter::{Page, PageMeta};

/// Success envelope: `{ "data": ..., "meta"?: ..., "message"?: ... }`
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: Option<PageMeta>,
    pub message: Option<String>,
    pub status_code: Option<StatusCode>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            data,
            meta: None,
            message: None,
            status_code: None, // Default to 200 OK
        }
    }

    /// Create an API response with custom status code
    pub fn with_status(data: T, status_code: StatusCode) -> Self {
        Self {
            status_code: Some(status_code),
            ..Self::success(data)
        }
    }

    /// Create a 201 Created response
    pub fn created(data: T) -> Self {
        Self::with_status(data, StatusCode::CREATED)
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Create a 204 No Content response (data will be ignored)
    pub fn no_content() -> ApiResponse<()> {
        ApiResponse::with_status((), StatusCode::NO_CONTENT)
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// A page of items with its pagination meta.
    pub fn page<U>(page: Page<U>) -> Self
    where
        T: From<U>,
    {
        let meta = page.meta;
        Self {
            meta: Some(meta),
            ..Self::success(page.items.into_iter().map(T::from).collect())
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        // For 204 No Content, return empty response
        if status == StatusCode::NO_CONTENT {
            return status.into_response();
        }

        // Convert data to JSON Value for consistent envelope format
        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to serialize response data" })),
                )
                    .into_response();
            }
        };

        let mut envelope = Map::new();
        envelope.insert("data".to_string(), data_value);
        if let Some(meta) = self.meta {
            envelope.insert("meta".to_string(), json!(meta));
        }
        if let Some(message) = self.message {
            envelope.insert("message".to_string(), Value::String(message));
        }

        (status, Json(Value::Object(envelope))).into_response()
    }
}

// Convenience type alias
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::PageRequest;
    use axum::body::to_bytes;

    async fn body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn plain_data_has_no_meta() {
        let response = ApiResponse::success(json!({ "id": 1 })).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body(response).await, json!({ "data": { "id": 1 } }));
    }

    #[tokio::test]
    async fn page_carries_meta() {
        let page = Page {
            items: vec![1_i64, 2],
            meta: PageMeta::new(PageRequest::new(1, 2), 5),
        };
        let response = ApiResponse::<Vec<i64>>::page(page).into_response();
        let value = body(response).await;
        assert_eq!(value["data"], json!([1, 2]));
        assert_eq!(value["meta"]["total_pages"], json!(3));
    }

    #[tokio::test]
    async fn created_with_message() {
        let response = ApiResponse::created(json!({})).message("Added 2 tag(s)").into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body(response).await["message"], json!("Added 2 tag(s)"));
    }

    #[test]
    fn no_content_is_empty() {
        let response = ApiResponse::<()>::no_content().into_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
