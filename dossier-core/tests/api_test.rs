mod common;

use common::{agent_session, supervisor_session, token_with, TestBackend};
use dossier_core::api::{agents, auth, demandes, profile, tasks, workload};
use dossier_core::client::FilePart;
use dossier_core::filter::DossierFilter;
use dossier_core::models::{BulkReassign, DemandeForm, PasswordChange};
use dossier_core::secrecy::Secret;
use dossier_core::session::MemorySessionStore;
use dossier_core::{ConsoleError, Role, SessionStore};
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, Request, ResponseTemplate};

fn credentials() -> auth::Credentials {
    auth::Credentials {
        email: "sup@portnet.ma".to_string(),
        password: Secret::new("s3cret".to_string()),
    }
}

#[tokio::test]
async fn login_decodes_role_when_response_has_none() {
    let backend = TestBackend::start().await;
    let token = token_with(json!({"roles": ["ROLE_SUPERVISEUR", "ROLE_AGENT"]}));

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "sup@portnet.ma", "password": "s3cret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jwt": token})))
        .expect(1)
        .mount(&backend.server)
        .await;

    let store = MemorySessionStore::new();
    let outcome = auth::sign_in(&backend.client, &store, &credentials())
        .await
        .unwrap();

    assert_eq!(outcome.role, Some(Role::Superviseur));
    let session = store.load().await.unwrap();
    assert_eq!(session.token.as_deref(), Some(token.as_str()));
    assert_eq!(session.role, Some(Role::Superviseur));
}

#[tokio::test]
async fn login_role_from_response_wins() {
    let backend = TestBackend::start().await;
    let token = token_with(json!({"roles": ["SUPERVISEUR"]}));

    Mock::given(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access_token": token, "role": "agent"})),
        )
        .mount(&backend.server)
        .await;

    let outcome = auth::login(&backend.client, &credentials()).await.unwrap();
    assert_eq!(outcome.role, Some(Role::Agent));
}

#[tokio::test]
async fn login_without_token_is_rejected() {
    let backend = TestBackend::start().await;

    Mock::given(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"role": "AGENT"})))
        .mount(&backend.server)
        .await;

    let result = auth::login(&backend.client, &credentials()).await;
    assert!(matches!(result, Err(ConsoleError::Decode(_))));
}

#[tokio::test]
async fn login_failure_carries_backend_message() {
    let backend = TestBackend::start().await;

    Mock::given(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Identifiants invalides"})),
        )
        .mount(&backend.server)
        .await;

    let error = auth::login(&backend.client, &credentials()).await.unwrap_err();
    assert_eq!(error.status(), Some(StatusCode::UNAUTHORIZED));
    assert_eq!(error.display_text(), "Identifiants invalides");
}

#[tokio::test]
async fn get_me_falls_through_on_405() {
    let backend = TestBackend::start().await;

    Mock::given(path("/api/agents/me"))
        .respond_with(ResponseTemplate::new(405))
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"nomComplet": "Omar Idrissi"})))
        .expect(1)
        .mount(&backend.server)
        .await;

    let me = profile::get_me(&backend.client, &agent_session()).await.unwrap();
    assert_eq!(me.nom_complet, "Omar Idrissi");
}

#[tokio::test]
async fn get_me_stops_on_server_error() {
    let backend = TestBackend::start().await;

    Mock::given(path("/api/agents/me"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&backend.server)
        .await;

    let error = profile::get_me(&backend.client, &agent_session())
        .await
        .unwrap_err();
    assert_eq!(error.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
}

#[tokio::test]
async fn get_me_normalizes_second_route() {
    let backend = TestBackend::start().await;

    Mock::given(path("/api/agents/me"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "fullName": "Sara Alaoui",
            "phone": "0600112233",
            "authorities": ["ROLE_AGENT"],
            "enabled": true,
        })))
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend.server)
        .await;

    let me = profile::get_me(&backend.client, &agent_session()).await.unwrap();
    assert_eq!(me.nom_complet, "Sara Alaoui");
    assert_eq!(me.telephone, "0600112233");
    assert_eq!(me.role, "ROLE_AGENT");
    assert!(me.activated);
    assert_eq!(me.initials(), "SA");
}

#[tokio::test]
async fn password_change_reaches_the_put_variant() {
    let backend = TestBackend::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/change-password"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/users/me/password"))
        .respond_with(ResponseTemplate::new(405))
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/users/me/password"))
        .and(body_json(json!({"password": "N3w-pass", "oldPassword": "old-pass"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&backend.server)
        .await;

    let change = PasswordChange::new("old-pass", "N3w-pass", "N3w-pass");
    profile::change_password(&backend.client, &agent_session(), &change)
        .await
        .unwrap();
}

#[tokio::test]
async fn mismatched_password_confirmation_sends_nothing() {
    let backend = TestBackend::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend.server)
        .await;

    let change = PasswordChange::new("old-pass", "N3w-pass", "other");
    let result = profile::change_password(&backend.client, &agent_session(), &change).await;
    assert!(matches!(result, Err(ConsoleError::BadRequest(_))));
}

#[tokio::test]
async fn avatar_upload_returns_reported_url() {
    let backend = TestBackend::start().await;

    Mock::given(path("/api/profile/avatar"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/agents/me/avatar"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"avatarUrl": "/files/avatar-9.png"})),
        )
        .expect(1)
        .mount(&backend.server)
        .await;

    let file = FilePart {
        field: "file".into(),
        file_name: "me.png".into(),
        content_type: "image/png".into(),
        data: vec![0x89, 0x50, 0x4e, 0x47],
    };
    let url = profile::upload_avatar(&backend.client, &agent_session(), file)
        .await
        .unwrap();
    assert_eq!(url.as_deref(), Some("/files/avatar-9.png"));
}

fn from_param(request: &Request) -> Option<String> {
    request
        .url
        .query_pairs()
        .find(|(k, _)| k == "from")
        .map(|(_, v)| v.into_owned())
}

#[tokio::test]
async fn workload_probes_date_encodings_past_client_errors() {
    let backend = TestBackend::start().await;

    Mock::given(path("/api/agents/workload"))
        .and(|req: &Request| from_param(req).is_some_and(|v| v.len() == 10))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad date"))
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(path("/api/agents/workload"))
        .and(|req: &Request| from_param(req).is_some_and(|v| v.contains('T')))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [
            {"agentId": 7, "agentName": "Sara", "dossiersTotal": "12", "late": 1}
        ]})))
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(path("/api/agents/workload"))
        .and(|req: &Request| from_param(req).is_none())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&backend.server)
        .await;

    let rows = workload::fetch_workload(
        &backend.client,
        &supervisor_session(),
        &workload::WorkloadQuery::default(),
    )
    .await
    .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, "7");
    assert_eq!(rows[0].agent, "Sara");
    assert_eq!(rows[0].dossiers_total, 12);
    assert_eq!(rows[0].en_retard, 1);
}

#[tokio::test]
async fn workload_server_error_degrades_to_empty() {
    let backend = TestBackend::start().await;

    Mock::given(path("/api/agents/workload"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&backend.server)
        .await;

    let rows = workload::fetch_workload(
        &backend.client,
        &supervisor_session(),
        &workload::WorkloadQuery::default(),
    )
    .await
    .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn journal_reads_envelope_total() {
    let backend = TestBackend::start().await;

    Mock::given(method("GET"))
        .and(path("/api/dispatch/journal"))
        .and(query_param("bureau", "Casa"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalElements": 31,
            "content": [{"id": 1, "dossierId": "D-4", "fromAgent": "A", "newAgent": "B"}]
        })))
        .expect(1)
        .mount(&backend.server)
        .await;

    let query = workload::WorkloadQuery {
        bureau: Some("Casa".into()),
        ..Default::default()
    };
    let page = workload::fetch_journal(&backend.client, &supervisor_session(), &query)
        .await
        .unwrap();
    assert_eq!(page.total, 31);
    assert_eq!(page.items[0].dossier, "D-4");
    assert_eq!(page.items[0].by, "—");
}

#[tokio::test]
async fn bulk_reassign_posts_camel_case_body() {
    let backend = TestBackend::start().await;

    Mock::given(method("POST"))
        .and(path("/api/dossiers/bulk-reassign"))
        .and(body_json(json!({
            "dossierIds": ["D-1", "D-2"],
            "targetAgentId": "9",
            "reason": "Rééquilibrage"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"moved": 2})))
        .expect(1)
        .mount(&backend.server)
        .await;

    let request = BulkReassign::from_lines("D-1\n\nD-2\n", "9", None);
    let result = workload::bulk_reassign(&backend.client, &supervisor_session(), &request)
        .await
        .unwrap();
    assert_eq!(result["moved"], 2);
}

#[tokio::test]
async fn assigned_dossiers_are_deduplicated_and_filtered() {
    let backend = TestBackend::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tasks/my"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": [
            {"id": 1, "status": "EN_COURS", "demande": {"id": "D-1", "bureau": "Casa", "titre": "A"}},
            {"id": 2, "status": "EN_COURS", "demande": {"id": "D-1", "bureau": "Casa", "titre": "A"}},
            {"id": 3, "status": "NOUVEAU", "dossier": {"id": "D-2", "bureau": "Tanger"}},
        ]})))
        .mount(&backend.server)
        .await;

    let all = tasks::my_assigned_dossiers(&backend.client, &agent_session(), &DossierFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let filter = DossierFilter {
        bureau: Some("Tanger".into()),
        ..Default::default()
    };
    let rows = tasks::my_assigned_dossiers(&backend.client, &agent_session(), &filter)
        .await
        .unwrap();
    let tanger = filter.apply(&rows);
    assert_eq!(tanger.len(), 1);
    assert_eq!(tanger[0].id, "D-2");
}

#[tokio::test]
async fn assigned_dossiers_require_a_session() {
    let backend = TestBackend::start().await;

    let result = tasks::my_assigned_dossiers(
        &backend.client,
        &dossier_core::Session::anonymous(),
        &DossierFilter::default(),
    )
    .await;
    assert!(matches!(result, Err(ConsoleError::NoSession)));
}

#[tokio::test]
async fn claim_next_and_toggle() {
    let backend = TestBackend::start().await;

    Mock::given(method("POST"))
        .and(path("/api/tasks/next"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 44, "status": "EN_COURS", "demande": {"id": "D-8"}
        })))
        .mount(&backend.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/agents/5/toggle-activation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(false)))
        .mount(&backend.server)
        .await;

    let task = tasks::claim_next(&backend.client, &agent_session())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(task.id, "44");
    assert_eq!(task.dossier.id, "D-8");

    let enabled = agents::toggle_activation(&backend.client, &supervisor_session(), "5")
        .await
        .unwrap();
    assert!(!enabled);
}

#[tokio::test]
async fn create_demande_skips_missing_routes() {
    let backend = TestBackend::start().await;

    Mock::given(path("/api/demandes"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/dossiers"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 501})))
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(path("/api/requests"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&backend.server)
        .await;

    let form = DemandeForm {
        categorie: "Importation".into(),
        designation: "Pièces détachées".into(),
        devise: "EUR".into(),
        ..Default::default()
    };
    let created = demandes::create_demande(&backend.client, &agent_session(), &form, vec![])
        .await
        .unwrap();
    assert_eq!(created["id"], 501);
}
