use super::csv_response;
use crate::models::ConsoleUser;
use crate::AppState;
use axum::{
    extract::{Query, State},
    response::Response,
    Json,
};
use dossier_core::api::{dispatch, workload};
use dossier_core::api::workload::WorkloadQuery;
use dossier_core::export::workload_csv;
use dossier_core::models::{BulkReassign, JournalPage, WorkloadRow};
use dossier_core::ConsoleError;
use serde::Deserialize;
use serde_json::Value;

pub async fn workload(
    State(state): State<AppState>,
    user: ConsoleUser,
    Query(query): Query<WorkloadQuery>,
) -> Result<Json<Vec<WorkloadRow>>, ConsoleError> {
    let rows = workload::fetch_workload(&state.api, &user.session, &query).await?;
    Ok(Json(rows))
}

pub async fn workload_export(
    State(state): State<AppState>,
    user: ConsoleUser,
    Query(query): Query<WorkloadQuery>,
) -> Result<Response, ConsoleError> {
    let rows = workload::fetch_workload(&state.api, &user.session, &query).await?;
    Ok(csv_response("workload", workload_csv(&rows)?))
}

pub async fn journal(
    State(state): State<AppState>,
    user: ConsoleUser,
    Query(query): Query<WorkloadQuery>,
) -> Result<Json<JournalPage>, ConsoleError> {
    let page = workload::fetch_journal(&state.api, &user.session, &query).await?;
    Ok(Json(page))
}

#[derive(Debug, Default, Deserialize)]
pub struct DispatchQuery {
    pub limit: Option<u32>,
}

pub async fn run_dispatch(
    State(state): State<AppState>,
    user: ConsoleUser,
    Query(query): Query<DispatchQuery>,
) -> Result<Json<Value>, ConsoleError> {
    let result = dispatch::run_dispatch(&state.api, &user.session, query.limit).await?;
    Ok(Json(result))
}

/// Reassignment form: dossier numbers one per line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkReassignForm {
    #[serde(default)]
    pub dossier_ids: String,
    #[serde(default)]
    pub target_agent_id: String,
    pub reason: Option<String>,
}

pub async fn bulk_reassign(
    State(state): State<AppState>,
    user: ConsoleUser,
    Json(form): Json<BulkReassignForm>,
) -> Result<Json<Value>, ConsoleError> {
    let request = BulkReassign::from_lines(
        &form.dossier_ids,
        &form.target_agent_id,
        form.reason.as_deref(),
    );
    let result = workload::bulk_reassign(&state.api, &user.session, &request).await?;
    Ok(Json(result))
}
