use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Canonical dossier row shown to agents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseRecord {
    /// Never empty: backend id, else numero, else a positional placeholder.
    pub id: String,
    pub numero: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub statut: String,
    pub date: Option<String>,
    pub resume: String,
    pub bureau: String,
    pub categorie: String,
    /// Untransformed backend payload.
    #[serde(skip)]
    pub raw: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskAssignment {
    pub id: String,
    pub dossier: CaseRecord,
    pub status: Option<String>,
}

/// Dossier row of the supervisor's global list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupervisorDossier {
    pub id: String,
    pub id_db: Option<String>,
    pub categorie: String,
    pub bureau: String,
    pub statut: String,
    pub created_at: Option<String>,
    pub sla_hours: f64,
    pub agent: String,
    pub ice: String,
    pub operateur: String,
    pub montant: f64,
    pub age_hours: i64,
    pub sla_remaining_h: i64,
}

impl SupervisorDossier {
    /// Recomputes age and remaining SLA against `now`. Rows without a
    /// creation date count as created now.
    pub fn with_age(mut self, now: DateTime<Utc>) -> Self {
        let created = self
            .created_at
            .as_deref()
            .and_then(crate::filter::parse_timestamp)
            .unwrap_or(now);
        let age = (now - created).num_seconds() as f64 / 3600.0;
        self.age_hours = age.round().max(0.0) as i64;
        self.sla_remaining_h = (self.sla_hours - self.age_hours as f64).round().max(0.0) as i64;
        self
    }
}
