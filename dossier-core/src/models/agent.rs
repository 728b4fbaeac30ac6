use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

/// Row of the supervisor's agent list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentSummary {
    pub id: String,
    pub label: String,
    pub email: Option<String>,
    pub telephone: Option<String>,
    pub departement: Option<String>,
    pub enabled: bool,
}

/// Profile of the signed-in user. Only `nom_complet`, `telephone` and
/// `departement` are editable by the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentProfile {
    pub nom_complet: String,
    pub telephone: String,
    pub departement: String,
    pub email: Option<String>,
    pub user_id: Option<String>,
    pub superviseur_id: Option<String>,
    pub role: String,
    pub created_at: Option<String>,
    pub activated: bool,
    pub avatar_url: Option<String>,
}

impl AgentProfile {
    /// Up to two initials from the full name.
    pub fn initials(&self) -> String {
        self.nom_complet
            .split_whitespace()
            .take(2)
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn validate_full_name(value: &str) -> Result<(), ValidationError> {
    if value.trim().chars().count() >= 3 {
        Ok(())
    } else {
        Err(invalid("full_name", "Full name needs at least 3 characters"))
    }
}

/// `+` optional, a digit, then at least seven digits, spaces or dashes.
fn validate_agent_phone(value: &str) -> Result<(), ValidationError> {
    let phone = value.trim();
    if phone.is_empty() {
        return Ok(());
    }
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    let mut chars = digits.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_digit())
        && chars.clone().count() >= 7
        && chars.all(|c| c.is_ascii_digit() || c == ' ' || c == '-');

    if valid {
        Ok(())
    } else {
        Err(invalid("phone", "Invalid phone number"))
    }
}

/// 6 to 20 characters among digits, `+`, parentheses, spaces and dashes.
fn validate_profile_phone(value: &str) -> Result<(), ValidationError> {
    let phone = value.trim();
    if phone.is_empty() {
        return Ok(());
    }
    let len = phone.chars().count();
    let valid = (6..=20).contains(&len)
        && phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '(' | ')' | ' ' | '-'));

    if valid {
        Ok(())
    } else {
        Err(invalid("phone", "Invalid phone number"))
    }
}

/// Supervisor form for a new agent. The backend mails the activation link.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewAgent {
    #[validate(custom(function = "validate_full_name"))]
    pub nom_complet: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "validate_agent_phone"))]
    pub telephone: String,
    #[serde(default)]
    pub departement: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default)]
    pub nom_complet: String,
    #[serde(default)]
    #[validate(custom(function = "validate_profile_phone"))]
    pub telephone: String,
    #[serde(default)]
    pub departement: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: Secret<String>,
    pub new_password: Secret<String>,
    pub confirm_password: Secret<String>,
}

impl PasswordChange {
    pub fn new(current: &str, new: &str, confirm: &str) -> Self {
        Self {
            current_password: Secret::new(current.to_string()),
            new_password: Secret::new(new.to_string()),
            confirm_password: Secret::new(confirm.to_string()),
        }
    }

    pub fn check(&self) -> Result<(), &'static str> {
        if self.current_password.expose_secret().is_empty() {
            return Err("Current password is required");
        }
        if self.new_password.expose_secret().is_empty() {
            return Err("New password is required");
        }
        if self.new_password.expose_secret() != self.confirm_password.expose_secret() {
            return Err("Password confirmation does not match");
        }
        Ok(())
    }
}
