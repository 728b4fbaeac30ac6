use super::degrade;
use crate::client::ApiClient;
use crate::error::ConsoleError;
use crate::filter::DossierFilter;
use crate::models::{CaseRecord, TaskAssignment};
use crate::normalize::{normalize_task, normalize_tasks, tasks_to_dossiers};
use crate::resolver::Candidate;
use crate::session::Session;

fn my_tasks_candidate(filter: &DossierFilter) -> Candidate {
    Candidate::get("/api/tasks/my")
        .query_opt("q", filter.q.as_deref())
        .query_opt("bureau", filter.bureau.as_deref())
        .query_opt("categorie", filter.categorie.as_deref())
        .query_opt("from", filter.from.as_deref())
        .query_opt("to", filter.to.as_deref())
}

/// The agent's assignments as a deduplicated dossier list. Filters are
/// forwarded, but not every backend honors them: callers apply
/// [`DossierFilter::apply`] to the result.
pub async fn my_assigned_dossiers(
    client: &ApiClient,
    session: &Session,
    filter: &DossierFilter,
) -> Result<Vec<CaseRecord>, ConsoleError> {
    let result = client
        .execute(session, &my_tasks_candidate(filter))
        .await
        .map(|body| tasks_to_dossiers(&body));
    degrade(result, "my_assigned_dossiers")
}

pub async fn my_tasks(
    client: &ApiClient,
    session: &Session,
) -> Result<Vec<TaskAssignment>, ConsoleError> {
    let result = client
        .execute(session, &Candidate::get("/api/tasks/my"))
        .await
        .map(|body| normalize_tasks(&body));
    degrade(result, "my_tasks")
}

/// Puts `claimed` first and drops any earlier copy of the same assignment.
pub fn prepend_claimed(tasks: Vec<TaskAssignment>, claimed: TaskAssignment) -> Vec<TaskAssignment> {
    let mut merged = Vec::with_capacity(tasks.len() + 1);
    let id = claimed.id.clone();
    merged.push(claimed);
    merged.extend(tasks.into_iter().filter(|t| t.id != id));
    merged
}

/// Claims the next task from the queue. `None` when the queue is empty.
pub async fn claim_next(
    client: &ApiClient,
    session: &Session,
) -> Result<Option<TaskAssignment>, ConsoleError> {
    let body = client
        .execute(
            session,
            &Candidate::post("/api/tasks/next").json(serde_json::json!({})),
        )
        .await?;
    if !body.is_object() {
        tracing::info!("No task left to claim");
        return Ok(None);
    }
    let task = normalize_task(&body, 0);
    tracing::info!(task_id = %task.id, dossier = %task.dossier.id, "Task claimed");
    Ok(Some(task))
}
