use super::read_upload;
use crate::models::ConsoleUser;
use crate::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use dossier_core::api::demandes;
use dossier_core::models::DemandeForm;
use dossier_core::ConsoleError;
use serde_json::Value;

/// New case: a `payload` JSON part plus any number of `documents`.
pub async fn create_demande(
    State(state): State<AppState>,
    user: ConsoleUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), ConsoleError> {
    let mut upload = read_upload(multipart).await?;

    let payload = upload
        .field("payload")
        .ok_or_else(|| ConsoleError::BadRequest("Missing payload part".to_string()))?;
    let form: DemandeForm = serde_json::from_str(payload)
        .map_err(|e| ConsoleError::BadRequest(format!("Invalid payload: {}", e)))?;
    let documents = upload.take_files("documents");

    let created = demandes::create_demande(&state.api, &user.session, &form, documents).await?;
    tracing::info!(categorie = %form.categorie, "Demande submitted");
    Ok((StatusCode::CREATED, Json(created)))
}
