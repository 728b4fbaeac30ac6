pub mod agents;
pub mod app;
pub mod auth;
pub mod demande;
pub mod dossiers;
pub mod metrics;
pub mod profile;
pub mod tasks;
pub mod workload;

use axum::{
    extract::Multipart,
    http::header,
    response::{IntoResponse, Response},
};
use dossier_core::client::FilePart;
use dossier_core::export::CSV_CONTENT_TYPE;
use dossier_core::ConsoleError;

/// CSV download named `<prefix>_<YYYY-MM-DD>.csv`.
pub(crate) fn csv_response(prefix: &str, body: String) -> Response {
    let file_name = format!("{}_{}.csv", prefix, chrono::Utc::now().format("%Y-%m-%d"));
    (
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response()
}

/// Text fields and file parts of a multipart upload, in arrival order.
#[derive(Debug, Default)]
pub(crate) struct Upload {
    pub fields: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

impl Upload {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn take_files(&mut self, name: &str) -> Vec<FilePart> {
        let (picked, rest): (Vec<FilePart>, Vec<FilePart>) = std::mem::take(&mut self.files)
            .into_iter()
            .partition(|file| file.field == name);
        self.files = rest;
        picked
    }
}

pub(crate) async fn read_upload(mut multipart: Multipart) -> Result<Upload, ConsoleError> {
    let mut upload = Upload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ConsoleError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ConsoleError::BadRequest(e.to_string()))?;

        match file_name {
            Some(file_name) => upload.files.push(FilePart {
                field: name,
                file_name,
                content_type,
                data: data.to_vec(),
            }),
            None => upload
                .fields
                .push((name, String::from_utf8_lossy(&data).into_owned())),
        }
    }

    Ok(upload)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(field: &str, name: &str) -> FilePart {
        FilePart {
            field: field.to_string(),
            file_name: name.to_string(),
            content_type: "application/pdf".to_string(),
            data: vec![1, 2, 3],
        }
    }

    #[test]
    fn take_files_keeps_the_other_parts() {
        let mut upload = Upload {
            fields: vec![("payload".to_string(), "{}".to_string())],
            files: vec![part("documents", "a.pdf"), part("file", "me.png"), part("documents", "b.pdf")],
        };

        let documents = upload.take_files("documents");
        let names: Vec<_> = documents.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf"]);
        assert_eq!(upload.files.len(), 1);
        assert_eq!(upload.field("payload"), Some("{}"));
        assert_eq!(upload.field("missing"), None);
    }

    #[test]
    fn csv_download_headers() {
        let response = csv_response("workload", "a,b\n".to_string());
        assert_eq!(response.headers()[header::CONTENT_TYPE], CSV_CONTENT_TYPE);
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap();
        assert!(disposition.starts_with("attachment; filename=\"workload_"));
        assert!(disposition.ends_with(".csv\""));
    }
}
