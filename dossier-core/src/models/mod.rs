pub mod agent;
pub mod demande;
pub mod dossier;
pub mod workload;

pub use agent::{AgentProfile, AgentSummary, NewAgent, PasswordChange, ProfileUpdate};
pub use demande::{dedupe_documents, DemandeForm};
pub use dossier::{CaseRecord, SupervisorDossier, TaskAssignment};
pub use workload::{BulkReassign, JournalEntry, JournalPage, WorkloadRow};
