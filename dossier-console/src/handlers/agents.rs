use crate::models::ConsoleUser;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use dossier_core::api::agents;
use dossier_core::filter::{activation_counts, search_agents};
use dossier_core::models::{AgentSummary, NewAgent};
use dossier_core::ConsoleError;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Default, Deserialize)]
pub struct AgentQuery {
    pub q: Option<String>,
}

/// Agent list with `?q=` search. Counts cover the whole list.
pub async fn list_agents(
    State(state): State<AppState>,
    user: ConsoleUser,
    Query(query): Query<AgentQuery>,
) -> Result<Json<Value>, ConsoleError> {
    let all = agents::list_agents(&state.api, &user.session).await?;
    let items = search_agents(&all, query.q.as_deref());
    Ok(Json(json!({
        "items": items,
        "counts": activation_counts(&all),
    })))
}

pub async fn assignable_agents(
    State(state): State<AppState>,
    user: ConsoleUser,
) -> Result<Json<Vec<AgentSummary>>, ConsoleError> {
    let items = agents::assignable_agents(&state.api, &user.session).await?;
    Ok(Json(items))
}

pub async fn create_agent(
    State(state): State<AppState>,
    user: ConsoleUser,
    Json(agent): Json<NewAgent>,
) -> Result<(StatusCode, Json<Value>), ConsoleError> {
    let created = agents::create_agent(&state.api, &user.session, &agent).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn toggle_activation(
    State(state): State<AppState>,
    user: ConsoleUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ConsoleError> {
    let enabled = agents::toggle_activation(&state.api, &user.session, &id).await?;
    Ok(Json(json!({ "id": id, "enabled": enabled })))
}

pub async fn delete_agent(
    State(state): State<AppState>,
    user: ConsoleUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ConsoleError> {
    agents::delete_agent(&state.api, &user.session, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
