//! Response normalizer.
//!
//! Backend variants name the same concept differently. Each canonical field
//! is resolved from an ordered alias list; the first alias holding a value
//! wins. Aliases may be dotted paths into nested objects
//! (`bureauDouanier.description`). Adding a backend variant means editing an
//! alias table, not the code below it.

use crate::models::{
    AgentProfile, AgentSummary, CaseRecord, JournalEntry, JournalPage, SupervisorDossier,
    TaskAssignment, WorkloadRow,
};
use serde_json::{json, Map, Value};
use std::collections::HashSet;

/// Placeholder for text fields the backend left empty.
pub const MISSING: &str = "—";

pub struct CaseAliases {
    pub id: &'static [&'static str],
    pub numero: &'static [&'static str],
    pub kind: &'static [&'static str],
    pub statut: &'static [&'static str],
    pub date: &'static [&'static str],
    pub resume: &'static [&'static str],
    pub bureau: &'static [&'static str],
    pub categorie: &'static [&'static str],
}

pub const CASE: CaseAliases = CaseAliases {
    id: &["id"],
    numero: &["numeroEnregistrement", "numero", "reference", "ref", "code", "id"],
    kind: &["type", "categorie", "category", "nature"],
    statut: &["statut", "status"],
    date: &["createdAt", "dateCreation", "created", "date", "submittedAt"],
    resume: &["objet", "titre", "title", "description", "resume"],
    bureau: &["bureau", "office"],
    categorie: &["categorie", "category"],
};

pub struct TaskAliases {
    pub id: &'static [&'static str],
    pub embedded: &'static [&'static str],
    pub status: &'static [&'static str],
    pub created: &'static [&'static str],
}

pub const TASK: TaskAliases = TaskAliases {
    id: &["id", "assignmentId"],
    embedded: &["demande", "dossier", "request", "ticket", "case"],
    status: &["status", "assignmentStatus"],
    created: &["dateCreation", "createdAt"],
};

pub struct WorkloadAliases {
    pub id: &'static [&'static str],
    pub agent_id: &'static [&'static str],
    pub agent: &'static [&'static str],
    pub dossiers_total: &'static [&'static str],
    pub en_cours: &'static [&'static str],
    pub en_retard: &'static [&'static str],
    pub sla_median_min: &'static [&'static str],
    pub temps_moyen_min: &'static [&'static str],
    pub productivite_j: &'static [&'static str],
}

pub const WORKLOAD: WorkloadAliases = WorkloadAliases {
    id: &["id", "agentId", "userId"],
    agent_id: &["agentId", "id", "userId"],
    agent: &["agent", "agentName", "fullName", "nom", "nomComplet", "email"],
    dossiers_total: &["dossiersTotal", "total"],
    en_cours: &["enCours", "inProgress"],
    en_retard: &["enRetard", "late"],
    sla_median_min: &["slaMedianMin", "sla_median_min"],
    temps_moyen_min: &["tempsMoyenMin", "avgHandleMin"],
    productivite_j: &["productiviteJ", "dailyThroughput"],
};

pub struct JournalAliases {
    pub id: &'static [&'static str],
    pub date: &'static [&'static str],
    pub dossier: &'static [&'static str],
    pub from: &'static [&'static str],
    pub to_agent: &'static [&'static str],
    pub by: &'static [&'static str],
    pub motif: &'static [&'static str],
    pub total: &'static [&'static str],
}

pub const JOURNAL: JournalAliases = JournalAliases {
    id: &["id", "eventId"],
    date: &["date", "createdAt", "timestamp", "eventDate"],
    dossier: &["dossier", "dossierId", "numero", "reference", "caseNumber"],
    from: &["from", "fromAgent", "source", "oldAgent", "oldQueue"],
    to_agent: &["toAgent", "to", "newAgent", "assignee"],
    by: &["by", "user", "triggeredBy", "performedBy"],
    motif: &["motif", "reason", "cause"],
    total: &["total", "totalElements"],
};

pub struct AgentAliases {
    pub id: &'static [&'static str],
    pub label: &'static [&'static str],
    pub email: &'static [&'static str],
    pub telephone: &'static [&'static str],
    pub departement: &'static [&'static str],
    pub enabled: &'static [&'static str],
}

pub const AGENT: AgentAliases = AgentAliases {
    id: &["id", "agentId", "userId"],
    label: &["label", "nomComplet", "fullName", "name", "email"],
    email: &["email"],
    telephone: &["telephone", "phone"],
    departement: &["departement", "department"],
    enabled: &["enabled"],
};

pub struct ProfileAliases {
    pub nom_complet: &'static [&'static str],
    pub telephone: &'static [&'static str],
    pub departement: &'static [&'static str],
    pub email: &'static [&'static str],
    pub user_id: &'static [&'static str],
    pub superviseur_id: &'static [&'static str],
    pub role: &'static [&'static str],
    pub created_at: &'static [&'static str],
    pub activated: &'static [&'static str],
    pub avatar_url: &'static [&'static str],
}

pub const PROFILE: ProfileAliases = ProfileAliases {
    nom_complet: &["nom_complet", "nomComplet", "fullName", "name"],
    telephone: &["telephone", "phone"],
    departement: &["departement", "department"],
    email: &["email"],
    user_id: &["user_id", "userId", "user.id"],
    superviseur_id: &["superviseur_id", "superviseurId"],
    role: &["role"],
    created_at: &["date_creation", "dateCreation", "createdAt", "created"],
    activated: &["is_activated", "isActivated", "activated", "enabled", "active"],
    avatar_url: &["photoUrl", "avatarUrl", "imageUrl", "url"],
};

pub struct SupervisorDossierAliases {
    pub id_db: &'static [&'static str],
    pub numero: &'static [&'static str],
    pub bureau_nested: &'static [&'static str],
    pub created_at: &'static [&'static str],
    pub agent: &'static [&'static str],
    pub operateur: &'static [&'static str],
    pub ice: &'static [&'static str],
    pub montant: &'static [&'static str],
}

pub const SUPERVISOR_DOSSIER: SupervisorDossierAliases = SupervisorDossierAliases {
    id_db: &["idDb", "id_db", "id"],
    numero: &["numero_enregistrement", "numeroEnregistrement", "numero", "reference", "id"],
    bureau_nested: &["bureauDouanier.description", "bureauDouanier.code", "bureau.nom"],
    created_at: &["createdAt", "created_at", "date_creation", "dateCreation"],
    agent: &["agent.nomComplet", "agent.fullName", "derniereAffectation.agentNom", "agent"],
    operateur: &[
        "operateur",
        "importateur.raison_sociale",
        "importateur.raisonSociale",
        "importateur.societe",
        "importateur.nomComplet",
    ],
    ice: &["ice", "importateur.ice"],
    montant: &["montant", "totalMontant", "montantTotal"],
};

/// Response URLs of an avatar upload.
pub const AVATAR_URL: &[&str] = &["url", "avatarUrl", "photoUrl"];

/// Token field of a login response.
pub const LOGIN_TOKEN: &[&str] = &["token", "jwt", "access_token"];

pub const DEFAULT_SLA_HOURS: f64 = 72.0;

/// The list carried by a response: the array itself, or the `content` /
/// `items` array of an envelope. Anything else is an empty list.
pub fn unpack(value: &Value) -> &[Value] {
    match value {
        Value::Array(items) => items,
        Value::Object(map) => ["content", "items"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))
            .map(Vec::as_slice)
            .unwrap_or(&[]),
        _ => &[],
    }
}

fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, key| current.get(key))
        .filter(|v| !v.is_null())
}

/// First alias holding a non-null value.
pub fn first<'a>(value: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().find_map(|alias| lookup(value, alias))
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// First alias holding a scalar, rendered as text.
pub fn first_text(value: &Value, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .find_map(|alias| lookup(value, alias).and_then(as_text))
}

/// Like [`first_text`], but skips blank values. Used for identifiers.
fn first_key(value: &Value, aliases: &[&str]) -> Option<String> {
    aliases.iter().find_map(|alias| {
        lookup(value, alias)
            .and_then(as_text)
            .filter(|s| !s.trim().is_empty())
    })
}

fn text_or(value: &Value, aliases: &[&str], default: &str) -> String {
    first_text(value, aliases).unwrap_or_else(|| default.to_string())
}

/// Parse as a number, else zero. Fractions are rounded.
pub fn to_number(value: Option<&Value>) -> f64 {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse::<f64>().unwrap_or(0.0)
            }
        }
        Some(Value::Bool(true)) => 1.0,
        _ => 0.0,
    };
    if number.is_finite() {
        number
    } else {
        0.0
    }
}

pub fn to_int(value: Option<&Value>) -> i64 {
    to_number(value).round() as i64
}

pub fn normalize_dossier(raw: &Value, index: usize) -> CaseRecord {
    let aliases = &CASE;
    let numero = first_key(raw, aliases.numero).unwrap_or_else(|| format!("D-{}", index));
    let id = first_key(raw, aliases.id).unwrap_or_else(|| numero.clone());

    CaseRecord {
        id,
        numero,
        kind: text_or(raw, aliases.kind, MISSING),
        statut: text_or(raw, aliases.statut, MISSING),
        date: first_text(raw, aliases.date),
        resume: text_or(raw, aliases.resume, ""),
        bureau: text_or(raw, aliases.bureau, ""),
        categorie: text_or(raw, aliases.categorie, ""),
        raw: raw.clone(),
    }
}

pub fn normalize_dossiers(data: &Value) -> Vec<CaseRecord> {
    unpack(data)
        .iter()
        .enumerate()
        .map(|(index, raw)| normalize_dossier(raw, index))
        .collect()
}

fn embedded_case(task: &Value) -> &Value {
    static EMPTY: Value = Value::Null;
    TASK.embedded
        .iter()
        .find_map(|key| task.get(*key).filter(|v| v.is_object()))
        .unwrap_or(&EMPTY)
}

fn put(target: &mut Map<String, Value>, key: &str, value: Option<&Value>) {
    if let Some(value) = value {
        target.insert(key.to_string(), value.clone());
    }
}

/// Normalizes one task assignment; task level fields override the embedded
/// dossier where the task is the better source (status, type, date).
pub fn normalize_task(task: &Value, index: usize) -> TaskAssignment {
    let dossier = embedded_case(task);

    let mut merged = Map::new();
    for key in [
        "id",
        "numeroEnregistrement",
        "numero",
        "reference",
        "categorie",
        "titre",
        "objet",
        "description",
        "bureau",
    ] {
        put(&mut merged, key, lookup(dossier, key));
    }
    put(&mut merged, "type", first(dossier, &["type"]).or_else(|| first(task, &["type"])));
    put(
        &mut merged,
        "status",
        first(task, TASK.status).or_else(|| first(dossier, &["status"])),
    );
    put(
        &mut merged,
        "dateCreation",
        first(dossier, TASK.created).or_else(|| first(task, &["createdAt"])),
    );

    TaskAssignment {
        id: first_text(task, TASK.id).unwrap_or_else(|| format!("task-{}", index)),
        dossier: normalize_dossier(&Value::Object(merged), index),
        status: first_text(task, TASK.status),
    }
}

/// Dedup key of the dossier a task embeds: its id, else its numero, else a
/// `T-` key built from the task id or position.
fn task_case_key(task: &Value, index: usize) -> String {
    let dossier = embedded_case(task);
    first_key(dossier, CASE.id)
        .or_else(|| first_key(dossier, CASE.numero))
        .unwrap_or_else(|| {
            let task_id = first_key(task, &["id"]).unwrap_or_else(|| index.to_string());
            format!("T-{}", task_id)
        })
}

/// Assigned tasks → dossier list. A dossier referenced by several
/// assignments appears once, at its first position.
pub fn tasks_to_dossiers(data: &Value) -> Vec<CaseRecord> {
    let mut seen = HashSet::new();
    unpack(data)
        .iter()
        .enumerate()
        .filter(|(index, task)| seen.insert(task_case_key(task, *index)))
        .map(|(index, task)| normalize_task(task, index).dossier)
        .collect()
}

pub fn normalize_tasks(data: &Value) -> Vec<TaskAssignment> {
    unpack(data)
        .iter()
        .enumerate()
        .map(|(index, task)| normalize_task(task, index))
        .collect()
}

pub fn normalize_workload_row(raw: &Value, index: usize) -> WorkloadRow {
    let aliases = &WORKLOAD;
    WorkloadRow {
        id: first_text(raw, aliases.id).unwrap_or_else(|| format!("agent-{}", index)),
        agent_id: first_text(raw, aliases.agent_id),
        agent: text_or(raw, aliases.agent, MISSING),
        dossiers_total: to_int(first(raw, aliases.dossiers_total)),
        en_cours: to_int(first(raw, aliases.en_cours)),
        en_retard: to_int(first(raw, aliases.en_retard)),
        sla_median_min: to_int(first(raw, aliases.sla_median_min)),
        temps_moyen_min: to_int(first(raw, aliases.temps_moyen_min)),
        productivite_j: to_int(first(raw, aliases.productivite_j)),
    }
}

pub fn normalize_workload(data: &Value) -> Vec<WorkloadRow> {
    unpack(data)
        .iter()
        .enumerate()
        .map(|(index, raw)| normalize_workload_row(raw, index))
        .collect()
}

pub fn normalize_journal_entry(raw: &Value, index: usize) -> JournalEntry {
    let aliases = &JOURNAL;
    JournalEntry {
        id: first_text(raw, aliases.id).unwrap_or_else(|| index.to_string()),
        date: first_text(raw, aliases.date),
        dossier: text_or(raw, aliases.dossier, MISSING),
        from: text_or(raw, aliases.from, MISSING),
        to_agent: text_or(raw, aliases.to_agent, MISSING),
        by: text_or(raw, aliases.by, MISSING),
        motif: text_or(raw, aliases.motif, MISSING),
    }
}

pub fn normalize_journal(data: &Value) -> JournalPage {
    let items: Vec<JournalEntry> = unpack(data)
        .iter()
        .enumerate()
        .map(|(index, raw)| normalize_journal_entry(raw, index))
        .collect();
    let total = first(data, JOURNAL.total)
        .and_then(Value::as_u64)
        .unwrap_or(items.len() as u64);
    JournalPage { items, total }
}

pub fn normalize_agent(raw: &Value, index: usize) -> AgentSummary {
    let aliases = &AGENT;
    let id = first_text(raw, aliases.id).unwrap_or_else(|| format!("agent-{}", index));
    AgentSummary {
        label: first_text(raw, aliases.label).unwrap_or_else(|| format!("Agent #{}", id)),
        email: first_text(raw, aliases.email),
        telephone: first_text(raw, aliases.telephone),
        departement: first_text(raw, aliases.departement),
        enabled: first(raw, aliases.enabled)
            .and_then(Value::as_bool)
            .unwrap_or(true),
        id,
    }
}

pub fn normalize_agents(data: &Value) -> Vec<AgentSummary> {
    unpack(data)
        .iter()
        .enumerate()
        .map(|(index, raw)| normalize_agent(raw, index))
        .collect()
}

/// New activation state from a toggle response: `{ "enabled": bool }` or a
/// bare boolean.
pub fn toggled_state(data: &Value) -> bool {
    match data {
        Value::Object(_) => data.get("enabled").and_then(Value::as_bool).unwrap_or(false),
        Value::Bool(b) => *b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
        Value::Null => false,
    }
}

pub fn normalize_profile(raw: &Value) -> AgentProfile {
    let aliases = &PROFILE;
    let role = first_text(raw, aliases.role)
        .or_else(|| match raw.get("authorities") {
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .filter_map(as_text)
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            Some(other) => as_text(other),
            None => None,
        })
        .unwrap_or_else(|| MISSING.to_string());

    AgentProfile {
        nom_complet: text_or(raw, aliases.nom_complet, ""),
        telephone: text_or(raw, aliases.telephone, ""),
        departement: text_or(raw, aliases.departement, ""),
        email: first_text(raw, aliases.email),
        user_id: first_text(raw, aliases.user_id),
        superviseur_id: first_text(raw, aliases.superviseur_id),
        role,
        created_at: first_text(raw, aliases.created_at),
        activated: first(raw, aliases.activated).map(truthy).unwrap_or(false),
        avatar_url: first_text(raw, aliases.avatar_url),
    }
}

fn supervisor_bureau(raw: &Value) -> String {
    if let Some(Value::String(bureau)) = raw.get("bureau") {
        if !bureau.trim().is_empty() {
            return bureau.clone();
        }
    }
    first_text(raw, SUPERVISOR_DOSSIER.bureau_nested)
        .or_else(|| first_text(raw, &["bureau_douanier_id"]).map(|id| format!("Bureau #{}", id)))
        .unwrap_or_else(|| MISSING.to_string())
}

/// The console's supervisor status set.
pub mod status {
    pub const EN_ATTENTE: &str = "EN_ATTENTE";
    pub const EN_COURS: &str = "EN_COURS";
    pub const VALIDE: &str = "VALIDE";
    pub const REJETE: &str = "REJETE";

    /// Backend decision states and the status each one maps onto.
    pub const DECISIONS: &[(&str, &str)] = &[("ACCEPTEE", VALIDE), ("REFUSEE", REJETE)];
}

/// Backend decision states mapped onto the console's status set.
pub fn supervisor_status(raw: Option<&str>) -> String {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return status::EN_ATTENTE.to_string();
    }
    status::DECISIONS
        .iter()
        .find(|(decision, _)| *decision == raw)
        .map_or(raw, |(_, mapped)| *mapped)
        .to_string()
}

pub fn normalize_supervisor_dossier(raw: &Value) -> SupervisorDossier {
    let aliases = &SUPERVISOR_DOSSIER;
    let id_db = first_text(raw, aliases.id_db);
    let id = first_text(raw, aliases.numero)
        .or_else(|| id_db.clone())
        .unwrap_or_default();
    let sla_hours = raw
        .get("slaHours")
        .filter(|v| !v.is_null())
        .map(|v| to_number(Some(v)))
        .unwrap_or(DEFAULT_SLA_HOURS);

    SupervisorDossier {
        id,
        id_db,
        categorie: first_text(raw, &["categorie"])
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| MISSING.to_string()),
        bureau: supervisor_bureau(raw),
        statut: supervisor_status(raw.get("statut").and_then(Value::as_str)),
        created_at: first_text(raw, aliases.created_at),
        sla_hours,
        agent: first_text(raw, aliases.agent).unwrap_or_else(|| "-".to_string()),
        ice: first_text(raw, aliases.ice)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| MISSING.to_string()),
        operateur: first_text(raw, aliases.operateur)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| MISSING.to_string()),
        montant: to_number(first(raw, aliases.montant)),
        age_hours: 0,
        sla_remaining_h: 0,
    }
}

pub fn normalize_supervisor_dossiers(data: &Value) -> Vec<SupervisorDossier> {
    unpack(data).iter().map(normalize_supervisor_dossier).collect()
}

/// Canonical record as JSON, the form handed to views and exports.
pub fn canonical_json(record: &CaseRecord) -> Value {
    serde_json::to_value(record).unwrap_or_else(|_| json!({}))
}
