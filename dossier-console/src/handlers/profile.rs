use super::read_upload;
use crate::models::ConsoleUser;
use crate::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use dossier_core::api::profile;
use dossier_core::models::{AgentProfile, PasswordChange, ProfileUpdate};
use dossier_core::ConsoleError;
use serde_json::{json, Value};

pub async fn get_profile(
    State(state): State<AppState>,
    user: ConsoleUser,
) -> Result<Json<Value>, ConsoleError> {
    let me: AgentProfile = profile::get_me(&state.api, &user.session).await?;
    let initials = me.initials();
    Ok(Json(json!({
        "profile": me,
        "initials": initials,
    })))
}

pub async fn update_profile(
    State(state): State<AppState>,
    user: ConsoleUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<Value>, ConsoleError> {
    let updated = profile::update_me(&state.api, &user.session, &update).await?;
    Ok(Json(updated))
}

pub async fn upload_avatar(
    State(state): State<AppState>,
    user: ConsoleUser,
    multipart: Multipart,
) -> Result<Json<Value>, ConsoleError> {
    let mut upload = read_upload(multipart).await?;
    let file = upload
        .take_files("file")
        .into_iter()
        .next()
        .ok_or_else(|| ConsoleError::BadRequest("No file uploaded".to_string()))?;

    let url = profile::upload_avatar(&state.api, &user.session, file).await?;
    Ok(Json(json!({ "url": url })))
}

pub async fn change_password(
    State(state): State<AppState>,
    user: ConsoleUser,
    Json(change): Json<PasswordChange>,
) -> Result<StatusCode, ConsoleError> {
    profile::change_password(&state.api, &user.session, &change).await?;
    tracing::info!("Password changed");
    Ok(StatusCode::NO_CONTENT)
}
