use crate::client::FilePart;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

fn default_devise() -> String {
    "MAD".to_string()
}

/// Empty is fine; otherwise a non-negative number.
fn validate_non_negative(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || value.parse::<f64>().is_ok_and(|n| n >= 0.0) {
        return Ok(());
    }
    let mut error = ValidationError::new("non_negative");
    error.message = Some(Cow::Borrowed("Invalid value"));
    Err(error)
}

/// New case submission. Sent as the `payload` part of the multipart body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DemandeForm {
    #[validate(length(min = 1, message = "Required"))]
    pub categorie: String,
    #[serde(default)]
    pub bureau: String,
    #[validate(length(min = 1, message = "Required"))]
    pub designation: String,
    #[serde(default)]
    #[validate(custom(function = "validate_non_negative"))]
    pub quantite: String,
    #[serde(default)]
    pub code_sh: String,
    #[serde(default)]
    pub pays: String,
    #[serde(default)]
    #[validate(custom(function = "validate_non_negative"))]
    pub montant: String,
    #[serde(default = "default_devise")]
    pub devise: String,
}

/// Drops files already attached under the same name and size; a later pick
/// replaces the earlier one in place.
pub fn dedupe_documents(files: Vec<FilePart>) -> Vec<FilePart> {
    let mut kept: Vec<FilePart> = Vec::with_capacity(files.len());
    for file in files {
        match kept
            .iter_mut()
            .find(|k| k.file_name == file.file_name && k.data.len() == file.data.len())
        {
            Some(existing) => *existing = file,
            None => kept.push(file),
        }
    }
    kept
}
