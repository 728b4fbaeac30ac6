//! Token/role store.
//!
//! A [`Session`] is the explicit context handed to every data-access call.
//! Persistence is behind [`SessionStore`]: the console keeps it in the
//! browser's server-side session, tests use [`MemorySessionStore`].

use crate::claims::role_from_token;
use crate::error::ConsoleError;
use crate::role::Role;
use async_trait::async_trait;
use dashmap::DashMap;

pub const TOKEN_KEY: &str = "token";
pub const ROLE_KEY: &str = "role";

/// Bearer token and last-resolved role of one browser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub role: Option<Role>,
}

impl Session {
    pub fn new(token: impl Into<String>, role: Option<Role>) -> Self {
        let token = token.into();
        Self {
            token: (!token.trim().is_empty()).then_some(token),
            role,
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// The bearer token, or `NoSession` before any request is attempted.
    pub fn bearer(&self) -> Result<&str, ConsoleError> {
        self.token.as_deref().ok_or(ConsoleError::NoSession)
    }

    /// Stored role, otherwise the primary role decoded from the token.
    pub fn resolved_role(&self) -> Option<Role> {
        self.role
            .clone()
            .or_else(|| self.token.as_deref().and_then(role_from_token))
    }
}

/// Key/value persistence for the session. Every operation is a single
/// atomic read or write of one value.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<String>, ConsoleError>;

    async fn write(&self, key: &str, value: &str) -> Result<(), ConsoleError>;

    async fn remove(&self, key: &str) -> Result<(), ConsoleError>;

    /// Persists the token. An absent role is not guessed: any stale role is
    /// dropped and left for [`SessionStore::role`] to derive.
    async fn set_session(&self, token: &str, role: Option<&Role>) -> Result<(), ConsoleError> {
        self.write(TOKEN_KEY, token).await?;
        match role {
            Some(role) => self.write(ROLE_KEY, role.as_str()).await,
            None => self.remove(ROLE_KEY).await,
        }
    }

    /// Stored role, else decoded from the token and remembered.
    async fn role(&self) -> Result<Option<Role>, ConsoleError> {
        if let Some(role) = self.read(ROLE_KEY).await?.as_deref().and_then(Role::parse) {
            return Ok(Some(role));
        }

        let Some(token) = self.read(TOKEN_KEY).await? else {
            return Ok(None);
        };

        let role = role_from_token(&token);
        if let Some(role) = &role {
            self.write(ROLE_KEY, role.as_str()).await?;
        }
        Ok(role)
    }

    async fn load(&self) -> Result<Session, ConsoleError> {
        let token = self.read(TOKEN_KEY).await?.filter(|t| !t.trim().is_empty());
        let role = match token {
            Some(_) => self.role().await?,
            None => None,
        };
        Ok(Session { token, role })
    }

    async fn clear(&self) -> Result<(), ConsoleError> {
        self.remove(TOKEN_KEY).await?;
        self.remove(ROLE_KEY).await
    }
}

/// In-process store, one per simulated browser.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: DashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn read(&self, key: &str) -> Result<Option<String>, ConsoleError> {
        Ok(self.values.get(key).map(|v| v.value().clone()))
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), ConsoleError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), ConsoleError> {
        self.values.remove(key);
        Ok(())
    }
}
