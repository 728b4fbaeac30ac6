//! Shared authenticated HTTP client for the dossier backend.

use crate::error::{error_to_text, ConsoleError};
use crate::observability::TracedClientExt;
use crate::resolver::Candidate;
use crate::session::Session;
use reqwest::{multipart, Client};
use serde_json::Value;
use std::time::Duration;

/// Body of a candidate request. Multipart bodies are kept as plain data so
/// each attempt can build a fresh form.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(MultipartBody),
}

#[derive(Debug, Clone, Default)]
pub struct MultipartBody {
    pub fields: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn file(mut self, part: FilePart) -> Self {
        self.files.push(part);
        self
    }

    fn to_form(&self) -> Result<multipart::Form, ConsoleError> {
        let mut form = multipart::Form::new();
        for (name, value) in &self.fields {
            form = form.text(name.clone(), value.clone());
        }
        for file in &self.files {
            let part = multipart::Part::bytes(file.data.clone())
                .file_name(file.file_name.clone())
                .mime_str(&file.content_type)?;
            form = form.part(file.field.clone(), part);
        }
        Ok(form)
    }
}

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ConsoleError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends one candidate with the session's bearer token.
    ///
    /// Fails with `NoSession` before touching the network when the session
    /// has no token.
    pub async fn execute(
        &self,
        session: &Session,
        candidate: &Candidate,
    ) -> Result<Value, ConsoleError> {
        let token = session.bearer()?;
        self.send(Some(token), candidate).await
    }

    /// Unauthenticated call, used by login.
    pub async fn execute_public(&self, candidate: &Candidate) -> Result<Value, ConsoleError> {
        self.send(None, candidate).await
    }

    async fn send(&self, token: Option<&str>, candidate: &Candidate) -> Result<Value, ConsoleError> {
        let url = self.url(&candidate.path);
        let mut request = self.client.traced(candidate.method.clone(), &url);

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if !candidate.query.is_empty() {
            request = request.query(&candidate.query);
        }
        request = match &candidate.body {
            RequestBody::Empty => request,
            RequestBody::Json(body) => request.json(body),
            RequestBody::Multipart(body) => request.multipart(body.to_form()?),
        };

        let response = request.send().await.map_err(|e| {
            tracing::error!(method = %candidate.method, url = %url, error = %e, "Backend request failed");
            ConsoleError::Transport(e)
        })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ConsoleError::Upstream {
                status,
                method: candidate.method.clone(),
                path: candidate.path.clone(),
                message: error_to_text(status, &text),
            });
        }

        Ok(parse_body(&text))
    }
}

/// Empty bodies become `null`, non-JSON bodies a JSON string.
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
