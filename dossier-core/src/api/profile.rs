//! Current user profile: read, update, avatar and password.

use crate::client::{ApiClient, FilePart, MultipartBody};
use crate::error::ConsoleError;
use crate::models::{AgentProfile, PasswordChange, ProfileUpdate};
use crate::normalize::{first_text, normalize_profile, AVATAR_URL};
use crate::resolver::{resolve, Candidate, FallbackPolicy};
use crate::session::Session;
use secrecy::ExposeSecret;
use serde_json::{json, Value};
use validator::Validate;

const ME_PATHS: [&str; 3] = ["/api/agents/me", "/api/auth/me", "/api/users/me"];

const AVATAR_PATHS: [&str; 3] = [
    "/api/profile/avatar",
    "/api/agents/me/avatar",
    "/api/users/me/avatar",
];

pub fn get_me_candidates() -> Vec<Candidate> {
    ME_PATHS.iter().map(|path| Candidate::get(*path)).collect()
}

/// PUT on every path first, then PATCH.
pub fn update_me_candidates(body: &Value) -> Vec<Candidate> {
    let puts = ME_PATHS.iter().map(|path| Candidate::put(*path));
    let patches = ME_PATHS.iter().map(|path| Candidate::patch(*path));
    puts.chain(patches).map(|c| c.json(body.clone())).collect()
}

pub fn avatar_candidates(file: FilePart) -> Vec<Candidate> {
    let form = MultipartBody::new().file(FilePart {
        field: "file".to_string(),
        ..file
    });
    AVATAR_PATHS
        .iter()
        .map(|path| Candidate::post(*path).multipart(form.clone()))
        .collect()
}

/// Two endpoints, two methods, each with its own field names.
pub fn password_candidates(change: &PasswordChange) -> Vec<Candidate> {
    let current = change.current_password.expose_secret();
    let new = change.new_password.expose_secret();
    vec![
        Candidate::post("/api/auth/change-password").json(json!({
            "currentPassword": current,
            "newPassword": new,
            "confirmPassword": new,
        })),
        Candidate::post("/api/users/me/password").json(json!({
            "oldPassword": current,
            "newPassword": new,
        })),
        Candidate::put("/api/users/me/password").json(json!({
            "password": new,
            "oldPassword": current,
        })),
    ]
}

/// A 404 or 405 moves on to the next profile route.
pub async fn get_me_raw(client: &ApiClient, session: &Session) -> Result<Value, ConsoleError> {
    resolve(
        client,
        session,
        &get_me_candidates(),
        FallbackPolicy::ShapeMismatch,
        "get_me",
    )
    .await
    .into_result()
}

pub async fn get_me(client: &ApiClient, session: &Session) -> Result<AgentProfile, ConsoleError> {
    let raw = get_me_raw(client, session).await?;
    Ok(normalize_profile(&raw))
}

/// Sends only the owner-editable fields, trimmed. The name goes out under
/// both spellings the backends read.
pub async fn update_me(
    client: &ApiClient,
    session: &Session,
    update: &ProfileUpdate,
) -> Result<Value, ConsoleError> {
    update.validate()?;
    let nom_complet = update.nom_complet.trim();
    let body = json!({
        "nomComplet": nom_complet,
        "nom_complet": nom_complet,
        "telephone": update.telephone.trim(),
        "departement": update.departement.trim(),
    });
    resolve(
        client,
        session,
        &update_me_candidates(&body),
        FallbackPolicy::ShapeMismatch,
        "update_me",
    )
    .await
    .into_result()
}

/// Uploads the avatar and returns its URL when the backend reports one.
pub async fn upload_avatar(
    client: &ApiClient,
    session: &Session,
    file: FilePart,
) -> Result<Option<String>, ConsoleError> {
    let body = resolve(
        client,
        session,
        &avatar_candidates(file),
        FallbackPolicy::ShapeMismatch,
        "upload_avatar",
    )
    .await
    .into_result()?;
    Ok(first_text(&body, AVATAR_URL))
}

pub async fn change_password(
    client: &ApiClient,
    session: &Session,
    change: &PasswordChange,
) -> Result<(), ConsoleError> {
    change
        .check()
        .map_err(|msg| ConsoleError::BadRequest(msg.to_string()))?;
    resolve(
        client,
        session,
        &password_candidates(change),
        FallbackPolicy::ShapeMismatch,
        "change_password",
    )
    .await
    .into_result()
    .map(|_| ())
}
