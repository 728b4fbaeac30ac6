use super::degrade;
use crate::client::ApiClient;
use crate::error::ConsoleError;
use crate::models::{AgentSummary, NewAgent};
use crate::normalize::{normalize_agents, toggled_state};
use crate::resolver::Candidate;
use crate::session::Session;
use serde_json::{json, Value};
use validator::Validate;

pub async fn list_agents(
    client: &ApiClient,
    session: &Session,
) -> Result<Vec<AgentSummary>, ConsoleError> {
    let result = client
        .execute(session, &Candidate::get("/api/agents"))
        .await
        .map(|body| normalize_agents(&body));
    degrade(result, "list_agents")
}

/// Agents a dossier can be reassigned to.
pub async fn assignable_agents(
    client: &ApiClient,
    session: &Session,
) -> Result<Vec<AgentSummary>, ConsoleError> {
    let agents = list_agents(client, session).await?;
    Ok(agents.into_iter().filter(|a| a.enabled).collect())
}

/// Creates an agent; the backend sends the activation mail.
pub async fn create_agent(
    client: &ApiClient,
    session: &Session,
    agent: &NewAgent,
) -> Result<Value, ConsoleError> {
    agent.validate()?;
    let body = json!({
        "nomComplet": agent.nom_complet.trim(),
        "email": agent.email.trim(),
        "telephone": agent.telephone.trim(),
        "departement": agent.departement.trim(),
    });
    let created = client
        .execute(session, &Candidate::post("/api/agents").json(body))
        .await?;
    tracing::info!(email = %agent.email.trim(), "Agent created");
    Ok(created)
}

/// Flips activation and returns the new state.
pub async fn toggle_activation(
    client: &ApiClient,
    session: &Session,
    agent_id: &str,
) -> Result<bool, ConsoleError> {
    let path = format!("/api/agents/{}/toggle-activation", agent_id);
    let body = client.execute(session, &Candidate::post(path)).await?;
    let enabled = toggled_state(&body);
    tracing::info!(agent_id, enabled, "Agent activation toggled");
    Ok(enabled)
}

pub async fn delete_agent(
    client: &ApiClient,
    session: &Session,
    agent_id: &str,
) -> Result<(), ConsoleError> {
    let path = format!("/api/agents/{}", agent_id);
    client.execute(session, &Candidate::delete(path)).await?;
    tracing::info!(agent_id, "Agent deleted");
    Ok(())
}
