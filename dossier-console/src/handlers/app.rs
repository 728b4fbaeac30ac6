use crate::models::{ConsoleUser, SessionHandle};
use axum::{
    response::{IntoResponse, Redirect, Response},
    Json,
};
use dossier_core::guard::home_for;
use dossier_core::SessionStore;
use serde_json::{json, Value};

pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "dossier-console" }))
}

/// `/` sends the caller to the home of their role, or to the login page.
pub async fn index(session: SessionHandle) -> Response {
    match session.load().await {
        Ok(loaded) => Redirect::to(home_for(&loaded)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Landing of importers and operators.
pub async fn dashboard_operateur(user: ConsoleUser) -> Json<Value> {
    Json(json!({
        "role": user.session.role,
        "home": home_for(&user.session),
    }))
}

/// Unknown locations fall back to `/`.
pub async fn fallback() -> Redirect {
    Redirect::to("/")
}
