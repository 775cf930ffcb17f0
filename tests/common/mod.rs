#![allow(dead_code)]

use anyhow::{ensure, Context, Result};
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use readlist_api::database::DatabaseManager;
use readlist_api::{app, AppConfig, AppState};

pub const TEST_SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "secret1";

/// The full router over a private in-memory database.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    pub fn error(&self) -> Option<&str> {
        self.body["error"].as_str()
    }
}

impl TestApp {
    pub async fn spawn() -> Result<Self> {
        let pool = DatabaseManager::connect_in_memory().await?;

        let mut config = AppConfig::development();
        config.security.jwt_secret = TEST_SECRET.to_string();
        config.api.enable_request_logging = false;

        let state = AppState::new(pool, config);
        Ok(Self {
            router: app(state.clone()),
            state,
        })
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&value)?)
            }
            None => Body::empty(),
        };
        self.send(builder.body(body)?).await
    }

    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).context("response body is not JSON")?
        };
        Ok(TestResponse { status, body })
    }

    pub async fn get(&self, uri: &str, token: &str) -> Result<TestResponse> {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> Result<TestResponse> {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> Result<TestResponse> {
        self.request(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> Result<TestResponse> {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    /// Register `email` with [`PASSWORD`]; returns the token and user id.
    pub async fn register(&self, email: &str) -> Result<(String, i64)> {
        let res = self
            .request(
                Method::POST,
                "/auth/register",
                None,
                Some(json!({ "email": email, "password": PASSWORD })),
            )
            .await?;
        ensure!(res.status == StatusCode::CREATED, "register failed: {:?}", res);

        let token = res.data()["token"].as_str().context("token")?.to_string();
        let id = res.data()["user"]["id"].as_i64().context("user id")?;
        Ok((token, id))
    }

    /// Create a book and return its JSON representation.
    pub async fn create_book(&self, token: &str, body: Value) -> Result<Value> {
        let res = self.post("/books", token, body).await?;
        ensure!(res.status == StatusCode::CREATED, "create book failed: {:?}", res);
        Ok(res.data().clone())
    }

    pub async fn create_titled(&self, token: &str, title: &str) -> Result<i64> {
        let book = self
            .create_book(token, json!({ "title": title, "author": "Anonymous" }))
            .await?;
        book["id"].as_i64().context("book id")
    }
}

pub fn titles(data: &Value) -> Vec<String> {
    data.as_array()
        .map(|books| {
            books
                .iter()
                .filter_map(|b| b["title"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
