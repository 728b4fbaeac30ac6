use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use dossier_core::role::LOGIN_ROUTE;
use dossier_core::{ConsoleError, Session, SessionStore};

/// The browser's server-side session, seen as the console's token/role store.
#[derive(Clone)]
pub struct SessionHandle(pub tower_sessions::Session);

fn store_err(e: tower_sessions::session::Error) -> ConsoleError {
    ConsoleError::Session(e.to_string())
}

#[dossier_core::async_trait::async_trait]
impl SessionStore for SessionHandle {
    async fn read(&self, key: &str) -> Result<Option<String>, ConsoleError> {
        self.0.get::<String>(key).await.map_err(store_err)
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), ConsoleError> {
        self.0.insert(key, value).await.map_err(store_err)
    }

    async fn remove(&self, key: &str) -> Result<(), ConsoleError> {
        self.0.remove::<String>(key).await.map(|_| ()).map_err(store_err)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionHandle
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        tower_sessions::Session::from_request_parts(parts, state)
            .await
            .map(SessionHandle)
            .map_err(IntoResponse::into_response)
    }
}

/// Signed-in caller. Carries the session context handed to every backend call.
#[derive(Debug, Clone)]
pub struct ConsoleUser {
    pub session: Session,
}

#[async_trait]
impl<S> FromRequestParts<S> for ConsoleUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Already loaded by the guard on protected routes
        if let Some(session) = parts.extensions.get::<Session>() {
            return Ok(ConsoleUser {
                session: session.clone(),
            });
        }

        let handle = SessionHandle::from_request_parts(parts, state).await?;
        let session = handle.load().await.map_err(IntoResponse::into_response)?;

        if !session.has_token() {
            return Err(Redirect::to(LOGIN_ROUTE).into_response());
        }

        Ok(ConsoleUser { session })
    }
}
