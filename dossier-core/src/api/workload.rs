//! Supervisor workload, dispatch journal and bulk reassignment.

use super::degrade;
use crate::client::ApiClient;
use crate::error::ConsoleError;
use crate::filter::parse_timestamp;
use crate::models::{BulkReassign, JournalPage, WorkloadRow};
use crate::normalize::{normalize_journal, normalize_workload};
use crate::resolver::{resolve, Candidate, FallbackPolicy};
use crate::session::Session;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// Window used when the caller gives no dates.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadQuery {
    pub q: Option<String>,
    pub bureau: Option<String>,
    pub categorie: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl WorkloadQuery {
    fn window(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let from = self
            .from
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or(now - Duration::days(DEFAULT_WINDOW_DAYS));
        let to = self.to.as_deref().and_then(parse_timestamp).unwrap_or(now);
        (from, to)
    }

    fn base(&self, path: &str) -> Candidate {
        Candidate::get(path)
            .query_opt("q", self.q.as_deref())
            .query_opt("bureau", self.bureau.as_deref())
            .query_opt("categorie", self.categorie.as_deref())
    }
}

fn ymd(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

fn iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Same request with the window as plain dates, as full timestamps, then
/// without dates.
pub fn workload_candidates(query: &WorkloadQuery, now: DateTime<Utc>) -> Vec<Candidate> {
    const PATH: &str = "/api/agents/workload";
    let (from, to) = query.window(now);
    vec![
        query
            .base(PATH)
            .query("from", ymd(from))
            .query("to", ymd(to)),
        query
            .base(PATH)
            .query("from", iso(from))
            .query("to", iso(to)),
        query.base(PATH),
    ]
}

/// A rejected date encoding (any 4xx) moves on to the next one.
pub async fn fetch_workload(
    client: &ApiClient,
    session: &Session,
    query: &WorkloadQuery,
) -> Result<Vec<WorkloadRow>, ConsoleError> {
    let candidates = workload_candidates(query, Utc::now());
    let result = resolve(
        client,
        session,
        &candidates,
        FallbackPolicy::ClientErrors,
        "fetch_workload",
    )
    .await
    .into_result()
    .map(|body| normalize_workload(&body));
    degrade(result, "fetch_workload")
}

pub fn journal_candidate(query: &WorkloadQuery, now: DateTime<Utc>) -> Candidate {
    let (from, to) = query.window(now);
    query
        .base("/api/dispatch/journal")
        .query("from", ymd(from))
        .query("to", ymd(to))
}

pub async fn fetch_journal(
    client: &ApiClient,
    session: &Session,
    query: &WorkloadQuery,
) -> Result<JournalPage, ConsoleError> {
    let candidate = journal_candidate(query, Utc::now());
    let result = client
        .execute(session, &candidate)
        .await
        .map(|body| normalize_journal(&body));
    degrade(result, "fetch_journal")
}

/// Rejected locally when no dossier or no target agent is given.
pub async fn bulk_reassign(
    client: &ApiClient,
    session: &Session,
    request: &BulkReassign,
) -> Result<Value, ConsoleError> {
    request.validate()?;
    let body = serde_json::to_value(request).map_err(|e| ConsoleError::BadRequest(e.to_string()))?;
    let result = client
        .execute(
            session,
            &Candidate::post("/api/dossiers/bulk-reassign").json(body),
        )
        .await?;
    tracing::info!(
        count = request.dossier_ids.len(),
        target = %request.target_agent_id,
        "Dossiers reassigned"
    );
    Ok(result)
}
