//! CSV downloads of the console lists.

use crate::error::ConsoleError;
use crate::models::{CaseRecord, SupervisorDossier, WorkloadRow};
use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

const AGENT_HEADER: [&str; 7] = [
    "numero",
    "type",
    "statut",
    "date",
    "resume",
    "bureau",
    "categorie",
];

const SUPERVISOR_HEADER: [&str; 12] = [
    "id",
    "categorie",
    "bureau",
    "statut",
    "createdAt",
    "slaHours",
    "agent",
    "ice",
    "operateur",
    "montant",
    "ageHours",
    "slaRemainingH",
];

const WORKLOAD_HEADER: [&str; 8] = [
    "agentId",
    "agent",
    "dossiersTotal",
    "enCours",
    "enRetard",
    "slaMedianMin",
    "tempsMoyenMin",
    "productiviteJ",
];

fn writer(delimiter: u8, quote_style: QuoteStyle) -> Writer<Vec<u8>> {
    WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(quote_style)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

fn finish(wtr: Writer<Vec<u8>>) -> Result<String, ConsoleError> {
    let bytes = wtr
        .into_inner()
        .map_err(|e| ConsoleError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ConsoleError::Export(e.to_string()))
}

fn write_err(e: csv::Error) -> ConsoleError {
    ConsoleError::Export(e.to_string())
}

/// Agent values never carry the delimiter or a line break.
fn flatten(value: &str) -> String {
    value.replace(';', ",").replace(['\r', '\n'], " ")
}

/// Assigned dossiers: `;` delimited, every field quoted.
pub fn agent_dossiers_csv<'a>(
    records: impl IntoIterator<Item = &'a CaseRecord>,
) -> Result<String, ConsoleError> {
    let mut wtr = writer(b';', QuoteStyle::Always);
    wtr.write_record(AGENT_HEADER).map_err(write_err)?;

    for record in records {
        let fields = [
            record.numero.as_str(),
            record.kind.as_str(),
            record.statut.as_str(),
            record.date.as_deref().unwrap_or_default(),
            record.resume.as_str(),
            record.bureau.as_str(),
            record.categorie.as_str(),
        ];
        wtr.write_record(fields.map(flatten)).map_err(write_err)?;
    }

    finish(wtr)
}

/// Supervisor dossier list: `,` delimited, quoted only when needed.
pub fn supervisor_dossiers_csv<'a>(
    rows: impl IntoIterator<Item = &'a SupervisorDossier>,
) -> Result<String, ConsoleError> {
    let mut wtr = writer(b',', QuoteStyle::Necessary);
    wtr.write_record(SUPERVISOR_HEADER).map_err(write_err)?;

    for row in rows {
        wtr.write_record([
            row.id.clone(),
            row.categorie.clone(),
            row.bureau.clone(),
            row.statut.clone(),
            row.created_at.clone().unwrap_or_default(),
            row.sla_hours.to_string(),
            row.agent.clone(),
            row.ice.clone(),
            row.operateur.clone(),
            row.montant.to_string(),
            row.age_hours.to_string(),
            row.sla_remaining_h.to_string(),
        ])
        .map_err(write_err)?;
    }

    finish(wtr)
}

pub fn workload_csv(rows: &[WorkloadRow]) -> Result<String, ConsoleError> {
    let mut wtr = writer(b',', QuoteStyle::Necessary);
    wtr.write_record(WORKLOAD_HEADER).map_err(write_err)?;

    for row in rows {
        wtr.write_record([
            row.agent_id.clone().unwrap_or_default(),
            row.agent.clone(),
            row.dossiers_total.to_string(),
            row.en_cours.to_string(),
            row.en_retard.to_string(),
            row.sla_median_min.to_string(),
            row.temps_moyen_min.to_string(),
            row.productivite_j.to_string(),
        ])
        .map_err(write_err)?;
    }

    finish(wtr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{normalize_dossier, normalize_supervisor_dossier, normalize_workload};
    use serde_json::json;

    #[test]
    fn agent_export_quotes_and_flattens() {
        let record = normalize_dossier(
            &json!({"numero": "2024-1", "type": "IMPORT", "statut": "EN_COURS",
                    "objet": "Lot A; lot B\nsuite", "bureau": "Casa"}),
            0,
        );
        let csv = agent_dossiers_csv([&record]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            r#""numero";"type";"statut";"date";"resume";"bureau";"categorie""#
        );
        assert_eq!(
            lines[1],
            r#""2024-1";"IMPORT";"EN_COURS";"";"Lot A, lot B suite";"Casa";"""#
        );
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn supervisor_export_quotes_only_when_needed() {
        let row = normalize_supervisor_dossier(&json!({
            "numero": "A-1",
            "categorie": "IMPORT",
            "bureau": "Casa, Port",
            "statut": "EN_COURS",
            "montant": 10,
            "slaHours": 48,
        }));
        let csv = supervisor_dossiers_csv([&row]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert!(lines[0].starts_with("id,categorie,bureau,statut,createdAt,slaHours"));
        assert_eq!(lines[1], r#"A-1,IMPORT,"Casa, Port",EN_COURS,,48,-,—,—,10,0,0"#);
    }

    #[test]
    fn workload_export() {
        let rows = normalize_workload(&json!([{"agentId": 3, "agent": "Sara", "total": "5"}]));
        let csv = workload_csv(&rows).unwrap();
        assert_eq!(csv.lines().nth(1), Some("3,Sara,5,0,0,0,0,0"));
    }
}
