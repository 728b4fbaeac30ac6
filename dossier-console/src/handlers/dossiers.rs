use super::csv_response;
use crate::models::ConsoleUser;
use crate::AppState;
use axum::{
    extract::{Query, State},
    response::Response,
    Json,
};
use dossier_core::api::{dossiers, tasks};
use dossier_core::export::{agent_dossiers_csv, supervisor_dossiers_csv};
use dossier_core::filter::{
    bureau_options, categorie_options, select_rows, status_counts, supervisor_bureau_options,
    DossierFilter, SupervisorFilter,
};
use dossier_core::ConsoleError;
use serde::Deserialize;
use serde_json::{json, Value};

/// Supervisor dossier list. Filters go to the backend and are applied again
/// here; counts and bureau options cover every fetched row.
pub async fn list_all(
    State(state): State<AppState>,
    user: ConsoleUser,
    Query(filter): Query<SupervisorFilter>,
) -> Result<Json<Value>, ConsoleError> {
    let rows = dossiers::list_all(&state.api, &user.session, &filter).await?;
    Ok(Json(json!({
        "items": filter.apply(&rows),
        "counts": status_counts(&rows),
        "bureaux": supervisor_bureau_options(&rows),
    })))
}

#[derive(Debug, Default, Deserialize)]
pub struct SupervisorExportQuery {
    pub q: Option<String>,
    pub statut: Option<String>,
    pub bureau: Option<String>,
    /// Comma separated selection. Every filtered row when absent.
    pub ids: Option<String>,
}

pub async fn export_all(
    State(state): State<AppState>,
    user: ConsoleUser,
    Query(query): Query<SupervisorExportQuery>,
) -> Result<Response, ConsoleError> {
    let filter = SupervisorFilter {
        q: query.q,
        statut: query.statut,
        bureau: query.bureau,
    };
    let rows = dossiers::list_all(&state.api, &user.session, &filter).await?;
    let filtered = filter.apply(&rows);

    let selection: Vec<String> = query
        .ids
        .as_deref()
        .map(|ids| {
            ids.split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let body = if selection.is_empty() {
        supervisor_dossiers_csv(filtered)?
    } else {
        supervisor_dossiers_csv(select_rows(filtered, &selection))?
    };
    Ok(csv_response("dossiers", body))
}

/// Dossiers assigned to the signed-in agent. Option lists cover every
/// assigned dossier, not just the filtered ones.
pub async fn my_dossiers(
    State(state): State<AppState>,
    user: ConsoleUser,
    Query(filter): Query<DossierFilter>,
) -> Result<Json<Value>, ConsoleError> {
    let rows = tasks::my_assigned_dossiers(&state.api, &user.session, &filter).await?;
    Ok(Json(json!({
        "items": filter.apply(&rows),
        "bureaux": bureau_options(&rows),
        "categories": categorie_options(&rows),
    })))
}

pub async fn export_my_dossiers(
    State(state): State<AppState>,
    user: ConsoleUser,
    Query(filter): Query<DossierFilter>,
) -> Result<Response, ConsoleError> {
    let rows = tasks::my_assigned_dossiers(&state.api, &user.session, &filter).await?;
    let body = agent_dossiers_csv(filter.apply(&rows))?;
    Ok(csv_response("mes_dossiers", body))
}
