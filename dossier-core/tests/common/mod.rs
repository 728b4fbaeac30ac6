#![allow(dead_code)]

use base64::{engine::general_purpose, Engine as _};
use dossier_core::{ApiClient, Session};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::MockServer;

/// A mock backend plus a client pointed at it.
pub struct TestBackend {
    pub server: MockServer,
    pub client: ApiClient,
}

impl TestBackend {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let client = ApiClient::new(server.uri(), Duration::from_secs(5))
            .expect("Failed to build API client");
        Self { server, client }
    }
}

pub fn token_with(payload: Value) -> String {
    let header = general_purpose::URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{}.{}.signature", header, body)
}

pub fn agent_session() -> Session {
    Session::new(
        token_with(json!({"sub": "agent@portnet.ma", "roles": ["ROLE_AGENT"]})),
        None,
    )
}

pub fn supervisor_session() -> Session {
    Session::new(
        token_with(json!({"sub": "sup@portnet.ma", "authorities": "ROLE_SUPERVISEUR"})),
        None,
    )
}
