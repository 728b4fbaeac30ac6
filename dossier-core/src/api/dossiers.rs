use crate::client::ApiClient;
use crate::error::ConsoleError;
use crate::filter::SupervisorFilter;
use crate::models::SupervisorDossier;
use crate::normalize::normalize_supervisor_dossiers;
use crate::resolver::Candidate;
use crate::session::Session;
use chrono::Utc;

/// Every dossier, for the supervisor. Age and remaining SLA are computed at
/// read time.
pub async fn list_all(
    client: &ApiClient,
    session: &Session,
    filter: &SupervisorFilter,
) -> Result<Vec<SupervisorDossier>, ConsoleError> {
    let candidate = Candidate::get("/api/demandes")
        .query_opt("q", filter.q.as_deref())
        .query_opt("statut", filter.statut.as_deref())
        .query_opt("bureau", filter.bureau.as_deref());
    let body = client.execute(session, &candidate).await?;

    let now = Utc::now();
    Ok(normalize_supervisor_dossiers(&body)
        .into_iter()
        .map(|row| row.with_age(now))
        .collect())
}
