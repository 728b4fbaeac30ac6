use serde::{Deserialize, Serialize};
use validator::Validate;

/// Per-agent load over the query window. All metrics are integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadRow {
    pub id: String,
    pub agent_id: Option<String>,
    pub agent: String,
    pub dossiers_total: i64,
    pub en_cours: i64,
    pub en_retard: i64,
    pub sla_median_min: i64,
    pub temps_moyen_min: i64,
    pub productivite_j: i64,
}

/// One reassignment event. Read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    pub date: Option<String>,
    pub dossier: String,
    pub from: String,
    pub to_agent: String,
    pub by: String,
    pub motif: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JournalPage {
    pub items: Vec<JournalEntry>,
    pub total: u64,
}

pub const DEFAULT_REASSIGN_REASON: &str = "Rééquilibrage";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BulkReassign {
    #[validate(length(min = 1, message = "At least one dossier is required"))]
    pub dossier_ids: Vec<String>,
    #[validate(length(min = 1, message = "A target agent is required"))]
    pub target_agent_id: String,
    pub reason: String,
}

impl BulkReassign {
    /// Builds a request from a textarea: one dossier number per line, blank
    /// lines dropped.
    pub fn from_lines(lines: &str, target_agent_id: &str, reason: Option<&str>) -> Self {
        let dossier_ids = lines
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        let reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_REASSIGN_REASON)
            .to_string();

        Self {
            dossier_ids,
            target_agent_id: target_agent_id.trim().to_string(),
            reason,
        }
    }
}
