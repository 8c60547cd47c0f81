//! Shared helpers for the router-level tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response},
    Router,
};
use backend_lib::{auth::hash_password, config::Settings, router::create_router, AppState};
use tempfile::TempDir;
use tower::ServiceExt;

pub const USERNAME: &str = "bat";
pub const PASSWORD: &str = "2005";
pub const SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub router: Router,
    pub dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.storage.root = dir.path().join("files");
        settings.auth.username = USERNAME.to_string();
        settings.auth.password_hash = hash_password(PASSWORD).unwrap();
        settings.auth.signing_secret = SECRET.to_string();
        settings.validate().unwrap();

        let state = Arc::new(AppState::from_settings(&settings).unwrap());
        Self {
            router: create_router(state),
            dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Log in and return the `name=value` pair of the session cookie.
    pub async fn login_cookie(&self) -> String {
        let response = self.send(login_request(USERNAME, PASSWORD)).await;
        assert_eq!(response.status(), 200);
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }
}

pub fn login_request(username: &str, password: &str) -> Request<Body> {
    let body = serde_json::json!({ "username": username, "password": password });
    Request::builder()
        .method("POST")
        .uri("/api/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
