//! In-process transport that serves requests from the mock API router.

use std::sync::Mutex;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use http_body_util::BodyExt;
use shop_core::{ApiError, HttpRequest, HttpResponse};
use shop_storefront::Transport;
use tower::ServiceExt;

pub const BASE_URL: &str = "http://shop.test/api";

/// Routes requests to an axum `Router` without a socket, keeping the session
/// cookie the way a browser would.
pub struct RouterTransport {
    app: Router,
    cookie: Mutex<Option<String>>,
}

impl RouterTransport {
    pub fn new(app: Router) -> Self {
        Self {
            app,
            cookie: Mutex::new(None),
        }
    }
}

#[async_trait]
impl Transport for RouterTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let uri = request
            .path
            .strip_prefix("http://shop.test")
            .ok_or_else(|| ApiError::Transport(format!("unknown host in {}", request.path)))?
            .to_string();
        let mut builder = Request::builder().method(request.method.as_str()).uri(uri);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        let cookie = self.cookie.lock().unwrap().clone();
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let req = builder
            .body(Body::from(request.body.unwrap_or_default()))
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let response = self
            .app
            .clone()
            .oneshot(req)
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            if let Some(pair) = set_cookie.to_str().ok().and_then(|v| v.split(';').next()) {
                *self.cookie.lock().unwrap() = Some(pair.to_string());
            }
        }
        let status = response.status().as_u16();
        let bytes = response
            .into_body()
            .collect()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?
            .to_bytes();

        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}
