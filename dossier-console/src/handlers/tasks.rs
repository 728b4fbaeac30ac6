use crate::models::ConsoleUser;
use crate::AppState;
use axum::{extract::State, Json};
use dossier_core::api::tasks;
use dossier_core::models::TaskAssignment;
use dossier_core::ConsoleError;
use serde_json::{json, Value};

pub async fn my_tasks(
    State(state): State<AppState>,
    user: ConsoleUser,
) -> Result<Json<Vec<TaskAssignment>>, ConsoleError> {
    let items = tasks::my_tasks(&state.api, &user.session).await?;
    Ok(Json(items))
}

/// Claims the next queued task and answers the refreshed list with it first.
pub async fn claim_next(
    State(state): State<AppState>,
    user: ConsoleUser,
) -> Result<Json<Value>, ConsoleError> {
    let claimed = tasks::claim_next(&state.api, &user.session).await?;
    let current = tasks::my_tasks(&state.api, &user.session).await?;

    let items = match claimed.clone() {
        Some(task) => tasks::prepend_claimed(current, task),
        None => current,
    };

    Ok(Json(json!({
        "claimed": claimed,
        "items": items,
    })))
}
