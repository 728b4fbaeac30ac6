#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use base64::{engine::general_purpose, Engine as _};
use dossier_console::config::SessionSettings;
use dossier_console::startup::build_router;
use dossier_console::AppState;
use dossier_core::ApiClient;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Console router wired to a mock backend.
pub struct TestConsole {
    pub backend: MockServer,
    pub app: Router,
}

impl TestConsole {
    pub async fn start() -> Self {
        let backend = MockServer::start().await;
        let api = ApiClient::new(backend.uri(), Duration::from_secs(5))
            .expect("Failed to build API client");
        let app = build_router(AppState::new(Arc::new(api)), &SessionSettings::default());
        Self { backend, app }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// Logs in against a backend that answers with `token`, and returns the
    /// session cookie.
    pub async fn login_with(&self, token: &str) -> String {
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": token })))
            .mount(&self.backend)
            .await;

        let response = self
            .send(
                Request::builder()
                    .method("POST")
                    .uri("/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({"email": "user@portnet.ma", "password": "s3cret"}).to_string(),
                    ))
                    .unwrap(),
            )
            .await;
        assert!(response.status().is_success(), "login failed: {}", response.status());
        session_cookie(&response)
    }
}

/// `name=value` part of the `set-cookie` header.
pub fn session_cookie(response: &Response<Body>) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie is set")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect has a location")
        .to_str()
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn token_with(payload: Value) -> String {
    let header = general_purpose::URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{}.{}.signature", header, body)
}

pub fn agent_token() -> String {
    token_with(json!({"sub": "agent@portnet.ma", "roles": ["ROLE_AGENT"]}))
}

pub fn supervisor_token() -> String {
    token_with(json!({"sub": "sup@portnet.ma", "authorities": ["ROLE_SUPERVISEUR"]}))
}
