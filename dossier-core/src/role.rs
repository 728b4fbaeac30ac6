use serde::{Serialize, Serializer};
use std::fmt;

/// Console roles, in routing priority order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Superviseur,
    Agent,
    Importateur,
    Operateur,
    /// An authority the console has no route for. Can still be the primary
    /// role when nothing better is present.
    Other(String),
}

pub const LOGIN_ROUTE: &str = "/login";

impl Role {
    /// Parses an already normalized or raw role name. Empty input yields `None`.
    pub fn parse(raw: &str) -> Option<Role> {
        let name = normalize_role(raw);
        match name.as_str() {
            "" => None,
            "SUPERVISEUR" => Some(Role::Superviseur),
            "AGENT" => Some(Role::Agent),
            "IMPORTATEUR" => Some(Role::Importateur),
            "OPERATEUR" => Some(Role::Operateur),
            _ => Some(Role::Other(name)),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Superviseur => "SUPERVISEUR",
            Role::Agent => "AGENT",
            Role::Importateur => "IMPORTATEUR",
            Role::Operateur => "OPERATEUR",
            Role::Other(name) => name,
        }
    }

    /// Lower ranks win when picking the primary role.
    fn rank(&self) -> u8 {
        match self {
            Role::Superviseur => 0,
            Role::Agent => 1,
            Role::Importateur => 2,
            Role::Operateur => 3,
            Role::Other(_) => 4,
        }
    }

    /// Landing route for the role; `None` for roles the console does not serve.
    pub fn home_route(&self) -> Option<&'static str> {
        match self {
            Role::Superviseur => Some("/agents"),
            Role::Agent => Some("/agent/dossiers"),
            Role::Importateur | Role::Operateur => Some("/dashboard-operateur"),
            Role::Other(_) => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Role::Other(_))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Upper-cases and strips a `ROLE_` prefix.
pub fn normalize_role(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    match upper.strip_prefix("ROLE_") {
        Some(rest) => rest.to_string(),
        None => upper,
    }
}

/// Picks the single primary role from normalized role names.
///
/// SUPERVISEUR > AGENT > IMPORTATEUR > OPERATEUR, otherwise the first seen.
pub fn primary_role(names: &[String]) -> Option<Role> {
    names
        .iter()
        .filter_map(|name| Role::parse(name))
        .min_by_key(Role::rank)
}
