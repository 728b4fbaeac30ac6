use crate::client::ApiClient;
use crate::error::ConsoleError;
use crate::resolver::Candidate;
use crate::session::Session;
use serde_json::Value;

pub const DEFAULT_DISPATCH_LIMIT: u32 = 10;

/// Triggers the backend dispatcher for up to `limit` queued dossiers.
pub async fn run_dispatch(
    client: &ApiClient,
    session: &Session,
    limit: Option<u32>,
) -> Result<Value, ConsoleError> {
    let limit = limit.filter(|l| *l > 0).unwrap_or(DEFAULT_DISPATCH_LIMIT);
    let candidate = Candidate::post("/api/dispatch/run").query("limit", limit.to_string());
    let result = client.execute(session, &candidate).await?;
    tracing::info!(limit, "Dispatch run triggered");
    Ok(result)
}
