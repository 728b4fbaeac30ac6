mod common;

use common::{agent_session, TestBackend};
use dossier_core::{resolve, ApiClient, Candidate, ConsoleError, FallbackPolicy, Resolution, Session};
use reqwest::StatusCode;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{any, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn shape_mismatch_falls_through_and_stops_at_first_success() {
    let backend = TestBackend::start().await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"from": "b"})))
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/c"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend.server)
        .await;

    let candidates = [Candidate::get("/a"), Candidate::get("/b"), Candidate::get("/c")];
    let resolution = resolve(
        &backend.client,
        &agent_session(),
        &candidates,
        FallbackPolicy::ShapeMismatch,
        "test",
    )
    .await;

    match resolution {
        Resolution::Resolved {
            body,
            candidate,
            attempts,
        } => {
            assert_eq!(body, json!({"from": "b"}));
            assert_eq!(candidate, 1);
            assert_eq!(attempts, 2);
        }
        other => panic!("expected a resolved call, got {:?}", other),
    }
}

#[tokio::test]
async fn server_error_stops_the_probe() {
    let backend = TestBackend::start().await;

    Mock::given(path("/a"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(path("/b"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend.server)
        .await;

    let resolution = resolve(
        &backend.client,
        &agent_session(),
        &[Candidate::get("/a"), Candidate::get("/b")],
        FallbackPolicy::ShapeMismatch,
        "test",
    )
    .await;

    assert_eq!(resolution.attempts(), 1);
    match resolution.into_result() {
        Err(ConsoleError::Upstream {
            status, message, ..
        }) => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(message, "boom");
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn exhaustion_surfaces_the_last_error() {
    let backend = TestBackend::start().await;

    Mock::given(path("/a"))
        .respond_with(ResponseTemplate::new(405))
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(path("/b"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such route"))
        .expect(1)
        .mount(&backend.server)
        .await;

    let resolution = resolve(
        &backend.client,
        &agent_session(),
        &[Candidate::post("/a"), Candidate::post("/b")],
        FallbackPolicy::ShapeMismatch,
        "test",
    )
    .await;

    assert_eq!(resolution.attempts(), 2);
    let error = resolution.into_result().unwrap_err();
    assert_eq!(error.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(error.display_text(), "no such route");
}

#[tokio::test]
async fn bearer_token_is_sent() {
    let backend = TestBackend::start().await;
    let session = Session::new("abc.def.ghi", None);

    Mock::given(header("authorization", "Bearer abc.def.ghi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&backend.server)
        .await;

    let body = resolve(
        &backend.client,
        &session,
        &[Candidate::get("/api/tasks/my")],
        FallbackPolicy::default(),
        "test",
    )
    .await
    .into_result()
    .unwrap();
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn no_session_makes_no_request() {
    let backend = TestBackend::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend.server)
        .await;

    let resolution = resolve(
        &backend.client,
        &Session::anonymous(),
        &[Candidate::get("/api/agents/me")],
        FallbackPolicy::ShapeMismatch,
        "test",
    )
    .await;

    assert_eq!(resolution.attempts(), 0);
    assert!(matches!(resolution.into_result(), Err(ConsoleError::NoSession)));
}

#[tokio::test]
async fn empty_candidate_list() {
    let backend = TestBackend::start().await;

    let resolution = resolve(
        &backend.client,
        &agent_session(),
        &[],
        FallbackPolicy::default(),
        "test",
    )
    .await;

    assert_eq!(resolution.attempts(), 0);
    assert!(matches!(resolution.into_result(), Err(ConsoleError::NoCandidates)));
}

#[tokio::test]
async fn transport_failure_is_a_stop() {
    // Nothing listens on the discard port.
    let client = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();

    let resolution = resolve(
        &client,
        &agent_session(),
        &[Candidate::get("/a"), Candidate::get("/b")],
        FallbackPolicy::ClientErrors,
        "test",
    )
    .await;

    assert_eq!(resolution.attempts(), 1);
    assert!(matches!(resolution.into_result(), Err(ConsoleError::Transport(_))));
}
