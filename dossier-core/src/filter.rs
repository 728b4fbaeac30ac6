//! Client-side filters over already normalized lists.

use crate::models::{AgentSummary, CaseRecord, SupervisorDossier};
use crate::normalize::{status, MISSING};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parses the timestamp shapes the backend emits: RFC 3339, a naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]` (read as UTC) or a bare date.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&dt));
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|date| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
}

fn blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Filters of the agent's assigned-dossier view. Every field is optional;
/// empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DossierFilter {
    pub q: Option<String>,
    pub bureau: Option<String>,
    pub categorie: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl DossierFilter {
    pub fn matches(&self, record: &CaseRecord) -> bool {
        if let Some(term) = blank(&self.q) {
            let term = term.to_lowercase();
            let hit = [&record.numero, &record.kind, &record.statut, &record.resume]
                .iter()
                .any(|field| contains_ci(field, &term));
            if !hit {
                return false;
            }
        }
        if let Some(bureau) = blank(&self.bureau) {
            if record.bureau != bureau {
                return false;
            }
        }
        if let Some(categorie) = blank(&self.categorie) {
            if record.categorie != categorie {
                return false;
            }
        }

        // Unparseable bounds are ignored.
        let from = blank(&self.from).and_then(parse_timestamp);
        let to = blank(&self.to).and_then(end_of_day);
        if from.is_none() && to.is_none() {
            return true;
        }

        // A date bound excludes records without a parsable date.
        let Some(date) = record.date.as_deref().and_then(parse_timestamp) else {
            return false;
        };
        if let Some(from) = from {
            if date < from {
                return false;
            }
        }
        if let Some(to) = to {
            if date > to {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, records: &'a [CaseRecord]) -> Vec<&'a CaseRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

/// `to` bounds are inclusive through the end of that day.
fn end_of_day(value: &str) -> Option<DateTime<Utc>> {
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => date
            .and_hms_opt(23, 59, 59)
            .map(|dt| Utc.from_utc_datetime(&dt)),
        Err(_) => parse_timestamp(value),
    }
}

/// Distinct non-empty values, in first-seen order.
pub fn distinct<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = Vec::<String>::new();
    for value in values {
        if !value.is_empty() && !seen.iter().any(|s| s == value) {
            seen.push(value.to_string());
        }
    }
    seen
}

pub fn bureau_options(records: &[CaseRecord]) -> Vec<String> {
    distinct(records.iter().map(|r| r.bureau.as_str()))
}

pub fn categorie_options(records: &[CaseRecord]) -> Vec<String> {
    distinct(records.iter().map(|r| r.categorie.as_str()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisorFilter {
    pub q: Option<String>,
    pub statut: Option<String>,
    pub bureau: Option<String>,
}

impl SupervisorFilter {
    pub fn matches(&self, row: &SupervisorDossier) -> bool {
        if let Some(term) = blank(&self.q) {
            let hay = format!(
                "{} {} {} {} {} {}",
                row.id, row.ice, row.operateur, row.agent, row.categorie, row.bureau
            );
            if !contains_ci(&hay, &term.to_lowercase()) {
                return false;
            }
        }
        if let Some(statut) = blank(&self.statut) {
            if row.statut != statut {
                return false;
            }
        }
        if let Some(bureau) = blank(&self.bureau) {
            if row.bureau != bureau {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, rows: &'a [SupervisorDossier]) -> Vec<&'a SupervisorDossier> {
        rows.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Bureaux of the supervisor list, without the missing-value placeholder.
pub fn supervisor_bureau_options(rows: &[SupervisorDossier]) -> Vec<String> {
    distinct(
        rows.iter()
            .map(|r| r.bureau.as_str())
            .filter(|bureau| *bureau != MISSING),
    )
}

/// Rows picked for export, by database id or display id.
pub fn select_rows<'a>(
    rows: impl IntoIterator<Item = &'a SupervisorDossier>,
    ids: &[String],
) -> Vec<&'a SupervisorDossier> {
    rows.into_iter()
        .filter(|row| {
            let key = row.id_db.as_deref().unwrap_or(&row.id);
            ids.iter().any(|id| id == key)
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub total: usize,
    pub en_attente: usize,
    pub en_cours: usize,
    pub valide: usize,
    pub rejete: usize,
    /// Statuses outside the four known ones.
    pub other: BTreeMap<String, usize>,
}

/// Counts over the unfiltered list.
pub fn status_counts(rows: &[SupervisorDossier]) -> StatusCounts {
    let mut counts = StatusCounts {
        total: rows.len(),
        ..Default::default()
    };
    for row in rows {
        match row.statut.as_str() {
            status::EN_ATTENTE => counts.en_attente += 1,
            status::EN_COURS => counts.en_cours += 1,
            status::VALIDE => counts.valide += 1,
            status::REJETE => counts.rejete += 1,
            other => *counts.other.entry(other.to_string()).or_default() += 1,
        }
    }
    counts
}

/// Case-insensitive search on agent name and email.
pub fn search_agents<'a>(agents: &'a [AgentSummary], q: Option<&str>) -> Vec<&'a AgentSummary> {
    let term = q.map(str::trim).unwrap_or_default().to_lowercase();
    if term.is_empty() {
        return agents.iter().collect();
    }
    agents
        .iter()
        .filter(|a| {
            contains_ci(&a.label, &term)
                || a.email.as_deref().is_some_and(|e| contains_ci(e, &term))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActivationCounts {
    pub active: usize,
    pub inactive: usize,
}

pub fn activation_counts(agents: &[AgentSummary]) -> ActivationCounts {
    let active = agents.iter().filter(|a| a.enabled).count();
    ActivationCounts {
        active,
        inactive: agents.len() - active,
    }
}
