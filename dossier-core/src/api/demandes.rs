use crate::client::{ApiClient, FilePart, MultipartBody};
use crate::error::ConsoleError;
use crate::models::{dedupe_documents, DemandeForm};
use crate::resolver::{resolve, Candidate, FallbackPolicy};
use crate::session::Session;
use serde_json::Value;
use validator::Validate;

const CREATE_PATHS: [&str; 3] = ["/api/demandes", "/api/dossiers", "/api/requests"];

/// `payload` carries the form as JSON; each document is a `documents` part.
pub fn create_candidates(
    form: &DemandeForm,
    documents: Vec<FilePart>,
) -> Result<Vec<Candidate>, ConsoleError> {
    let payload =
        serde_json::to_string(form).map_err(|e| ConsoleError::BadRequest(e.to_string()))?;

    let body = dedupe_documents(documents)
        .into_iter()
        .fold(MultipartBody::new().text("payload", payload), |body, doc| {
            body.file(FilePart {
                field: "documents".to_string(),
                ..doc
            })
        });

    Ok(CREATE_PATHS
        .iter()
        .map(|path| Candidate::post(*path).multipart(body.clone()))
        .collect())
}

/// Submits a new case. Candidates are probed one at a time so a submission
/// is never created twice.
pub async fn create_demande(
    client: &ApiClient,
    session: &Session,
    form: &DemandeForm,
    documents: Vec<FilePart>,
) -> Result<Value, ConsoleError> {
    form.validate()?;
    let candidates = create_candidates(form, documents)?;
    resolve(
        client,
        session,
        &candidates,
        FallbackPolicy::ShapeMismatch,
        "create_demande",
    )
    .await
    .into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RequestBody;

    #[test]
    fn multipart_layout() {
        let form = DemandeForm {
            categorie: "Importation".into(),
            designation: "Textile".into(),
            devise: "MAD".into(),
            ..Default::default()
        };
        let doc = FilePart {
            field: "upload".into(),
            file_name: "facture.pdf".into(),
            content_type: "application/pdf".into(),
            data: b"%PDF".to_vec(),
        };
        let candidates = create_candidates(&form, vec![doc.clone(), doc]).unwrap();
        let paths: Vec<_> = candidates.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, CREATE_PATHS.to_vec());

        let RequestBody::Multipart(body) = &candidates[0].body else {
            panic!("expected multipart body");
        };
        assert_eq!(body.fields[0].0, "payload");
        let payload: Value = serde_json::from_str(&body.fields[0].1).unwrap();
        assert_eq!(payload["designation"], "Textile");
        assert_eq!(payload["codeSh"], "");
        assert_eq!(body.files.len(), 1);
        assert_eq!(body.files[0].field, "documents");
    }
}
