use crate::claims::role_from_token;
use crate::client::ApiClient;
use crate::error::ConsoleError;
use crate::normalize::{first_text, LOGIN_TOKEN};
use crate::resolver::Candidate;
use crate::role::Role;
use crate::session::SessionStore;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: Secret<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub token: String,
    /// Role from the response, else decoded from the token.
    pub role: Option<Role>,
}

/// `POST /api/auth/login`. The response carries the token under `token`,
/// `jwt` or `access_token`, and optionally a `role`.
pub async fn login(
    client: &ApiClient,
    credentials: &Credentials,
) -> Result<LoginOutcome, ConsoleError> {
    let candidate = Candidate::post("/api/auth/login").json(json!({
        "email": credentials.email,
        "password": credentials.password.expose_secret(),
    }));

    let body = client.execute_public(&candidate).await?;

    let token = first_text(&body, LOGIN_TOKEN)
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ConsoleError::Decode("login response carries no token".to_string()))?;

    let role = first_text(&body, &["role"])
        .as_deref()
        .and_then(Role::parse)
        .or_else(|| role_from_token(&token));

    tracing::info!(role = ?role.as_ref().map(Role::as_str), "Login succeeded");

    Ok(LoginOutcome { token, role })
}

/// Logs in and persists token and role in `store`.
pub async fn sign_in(
    client: &ApiClient,
    store: &dyn SessionStore,
    credentials: &Credentials,
) -> Result<LoginOutcome, ConsoleError> {
    let outcome = login(client, credentials).await?;
    store.set_session(&outcome.token, outcome.role.as_ref()).await?;
    Ok(outcome)
}

pub async fn sign_out(store: &dyn SessionStore) -> Result<(), ConsoleError> {
    store.clear().await
}
