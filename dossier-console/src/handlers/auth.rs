use crate::models::SessionHandle;
use crate::AppState;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use dossier_core::api::auth::{sign_in, sign_out, Credentials};
use dossier_core::role::LOGIN_ROUTE;
use dossier_core::{ConsoleError, SessionStore};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub from: Option<String>,
}

/// Login view state: whether a session exists and where the caller came from.
pub async fn login_page(
    session: SessionHandle,
    Query(query): Query<LoginQuery>,
) -> Result<Json<Value>, ConsoleError> {
    let loaded = session.load().await?;
    Ok(Json(json!({
        "authenticated": loaded.has_token(),
        "from": query.from,
    })))
}

pub async fn login_handler(
    State(state): State<AppState>,
    session: SessionHandle,
    Json(credentials): Json<Credentials>,
) -> Result<Json<Value>, ConsoleError> {
    // Fresh session id for the authenticated browser
    session
        .0
        .cycle_id()
        .await
        .map_err(|e| ConsoleError::Session(e.to_string()))?;

    let outcome = sign_in(&state.api, &session, &credentials).await?;
    let home = outcome
        .role
        .as_ref()
        .and_then(|role| role.home_route())
        .unwrap_or(LOGIN_ROUTE);

    tracing::info!(email = %credentials.email, home, "User signed in");

    Ok(Json(json!({
        "role": outcome.role,
        "home": home,
    })))
}

pub async fn logout_handler(session: SessionHandle) -> Response {
    match sign_out(&session).await {
        Ok(()) => Redirect::to(LOGIN_ROUTE).into_response(),
        Err(e) => e.into_response(),
    }
}
