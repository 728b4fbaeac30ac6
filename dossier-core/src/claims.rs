use crate::role::{normalize_role, primary_role, Role};
use base64::{engine::general_purpose, Engine as _};
use serde_json::{Map, Value};

/// Claim names that may carry the caller's authorities, in lookup order.
pub const ROLE_CLAIMS: &[&str] = &["roles", "authorities", "scope", "scopes"];

pub type Claims = Map<String, Value>;

/// Decode JWT claims without validation.
///
/// The token is only used to route the console; the backend enforces access
/// on every call. Anything malformed decodes to an empty claim set.
pub fn decode_claims(token: &str) -> Claims {
    let Some(payload) = token.split('.').nth(1) else {
        return Claims::new();
    };

    let payload = payload.trim_end_matches('=');
    let bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| general_purpose::STANDARD_NO_PAD.decode(payload));

    let Ok(bytes) = bytes else {
        tracing::debug!("Token payload is not base64url");
        return Claims::new();
    };

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(claims)) => claims,
        Ok(_) | Err(_) => {
            tracing::debug!("Token payload is not a JSON object");
            Claims::new()
        }
    }
}

/// Normalized role names carried by the claims: upper-cased, `ROLE_`
/// stripped, de-duplicated, in first-seen order.
pub fn roles_from_claims(claims: &Claims) -> Vec<String> {
    let raw = ROLE_CLAIMS
        .iter()
        .find_map(|name| claims.get(*name).filter(|v| !v.is_null()))
        .or_else(|| {
            claims
                .get("realm_access")
                .and_then(|realm| realm.get("roles"))
                .filter(|v| !v.is_null())
        });

    let names: Vec<String> = match raw {
        Some(Value::Array(items)) => items.iter().filter_map(authority_name).collect(),
        Some(Value::String(s)) => s
            .split(|c: char| c == ',' || c.is_whitespace())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };

    let mut roles: Vec<String> = Vec::with_capacity(names.len());
    for name in names.iter().map(|n| normalize_role(n)) {
        if !name.is_empty() && !roles.contains(&name) {
            roles.push(name);
        }
    }
    roles
}

/// Spring style `{"authority": "ROLE_X"}` entries are accepted next to plain strings.
fn authority_name(item: &Value) -> Option<String> {
    match item {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => ["authority", "role", "name"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string),
        _ => None,
    }
}

/// Primary role decoded from a bearer token, if any claim is recognizable.
pub fn role_from_token(token: &str) -> Option<Role> {
    primary_role(&roles_from_claims(&decode_claims(token)))
}
