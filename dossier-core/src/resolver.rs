//! Endpoint resolver.
//!
//! The backend does not expose the same routes in every deployment, so some
//! operations carry an ordered list of candidate requests. Candidates are
//! tried strictly one after the other: a candidate that reports "not here"
//! hands over to the next one, anything else ends the probe. This is not a
//! retry loop; every candidate is a different request.

use crate::client::{ApiClient, MultipartBody, RequestBody};
use crate::error::ConsoleError;
use crate::session::Session;
use reqwest::Method;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct Candidate {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl Candidate {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Adds the pair only when a value is present.
    pub fn query_opt(self, key: &str, value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn multipart(mut self, body: MultipartBody) -> Self {
        self.body = RequestBody::Multipart(body);
        self
    }
}

/// Whether the resolver moves on to the next candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Next,
    Stop,
}

/// Which failures mean "this backend variant has no such route".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// 404 and 405.
    #[default]
    ShapeMismatch,
    /// Any 4xx; used when the candidates differ by parameter encoding.
    ClientErrors,
}

impl FallbackPolicy {
    pub fn step(self, error: &ConsoleError) -> Step {
        let ConsoleError::Upstream { status, .. } = error else {
            return Step::Stop;
        };

        let next = match self {
            FallbackPolicy::ShapeMismatch => error.is_shape_mismatch(),
            FallbackPolicy::ClientErrors => status.is_client_error(),
        };

        if next {
            Step::Next
        } else {
            Step::Stop
        }
    }
}

#[derive(Debug)]
pub enum Resolution {
    Resolved {
        body: Value,
        /// Index of the candidate that answered.
        candidate: usize,
        attempts: usize,
    },
    Exhausted {
        error: ConsoleError,
        attempts: usize,
    },
}

impl Resolution {
    pub fn attempts(&self) -> usize {
        match self {
            Resolution::Resolved { attempts, .. } | Resolution::Exhausted { attempts, .. } => {
                *attempts
            }
        }
    }

    pub fn into_result(self) -> Result<Value, ConsoleError> {
        match self {
            Resolution::Resolved { body, .. } => Ok(body),
            Resolution::Exhausted { error, .. } => Err(error),
        }
    }
}

/// Tries `candidates` in order and returns the first success.
///
/// `operation` only labels the log lines.
pub async fn resolve(
    client: &ApiClient,
    session: &Session,
    candidates: &[Candidate],
    policy: FallbackPolicy,
    operation: &str,
) -> Resolution {
    if let Err(error) = session.bearer() {
        return Resolution::Exhausted { error, attempts: 0 };
    }

    let mut last_error = ConsoleError::NoCandidates;
    let mut attempts = 0;

    for (index, candidate) in candidates.iter().enumerate() {
        attempts += 1;
        tracing::debug!(
            operation,
            method = %candidate.method,
            path = %candidate.path,
            attempt = attempts,
            "Trying backend candidate"
        );

        match client.execute(session, candidate).await {
            Ok(body) => {
                if index > 0 {
                    tracing::info!(
                        operation,
                        method = %candidate.method,
                        path = %candidate.path,
                        attempt = attempts,
                        "Backend candidate answered after fallback"
                    );
                }
                return Resolution::Resolved {
                    body,
                    candidate: index,
                    attempts,
                };
            }
            Err(error) => match policy.step(&error) {
                Step::Next => {
                    tracing::debug!(operation, path = %candidate.path, error = %error, "Candidate not available");
                    last_error = error;
                }
                Step::Stop => {
                    tracing::warn!(
                        operation,
                        method = %candidate.method,
                        path = %candidate.path,
                        error = %error,
                        "Backend candidate failed, not trying further candidates"
                    );
                    return Resolution::Exhausted { error, attempts };
                }
            },
        }
    }

    tracing::warn!(operation, attempts, error = %last_error, "All backend candidates exhausted");
    Resolution::Exhausted {
        error: last_error,
        attempts,
    }
}
