//! Typed operations against the dossier backend.
//!
//! Each function takes the shared [`ApiClient`](crate::client::ApiClient)
//! and the caller's [`Session`](crate::session::Session). Operations whose
//! route differs between deployments go through the resolver; the others
//! issue a single request.

pub mod agents;
pub mod auth;
pub mod demandes;
pub mod dispatch;
pub mod dossiers;
pub mod profile;
pub mod tasks;
pub mod workload;

use crate::error::ConsoleError;

/// List reads degrade to an empty result. A missing session still surfaces
/// so the caller can send the browser to login.
pub(crate) fn degrade<T: Default>(
    result: Result<T, ConsoleError>,
    operation: &str,
) -> Result<T, ConsoleError> {
    match result {
        Ok(value) => Ok(value),
        Err(ConsoleError::NoSession) => Err(ConsoleError::NoSession),
        Err(error) => {
            tracing::warn!(operation, error = %error, "Backend read failed, returning empty result");
            Ok(T::default())
        }
    }
}
