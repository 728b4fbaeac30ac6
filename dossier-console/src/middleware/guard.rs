use crate::models::SessionHandle;
use crate::services::metrics::record_guard_redirect;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use dossier_core::guard::{check, GuardDecision, RouteAccess};
use dossier_core::role::LOGIN_ROUTE;
use dossier_core::SessionStore;

/// `/login?from=<attempted>`.
pub fn login_location(from: &str) -> String {
    match serde_urlencoded::to_string(&[("from", from)]) {
        Ok(query) => format!("{}?{}", LOGIN_ROUTE, query),
        Err(_) => LOGIN_ROUTE.to_string(),
    }
}

/// Evaluates the route guard before the handler runs. On success the loaded
/// session is left in the request extensions for [`crate::models::ConsoleUser`].
pub async fn guard_middleware(
    State(access): State<RouteAccess>,
    session: SessionHandle,
    mut request: Request,
    next: Next,
) -> Response {
    let attempted = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let loaded = match session.load().await {
        Ok(loaded) => loaded,
        Err(e) => return e.into_response(),
    };

    match check(&loaded, &access, &attempted) {
        GuardDecision::Allow => {
            request.extensions_mut().insert(loaded);
            next.run(request).await
        }
        GuardDecision::RedirectToLogin { from } => {
            tracing::debug!(%from, "No session, redirecting to login");
            record_guard_redirect("login");
            Redirect::to(&login_location(&from)).into_response()
        }
        GuardDecision::RedirectToHome { location } => {
            tracing::info!(
                role = ?loaded.role.as_ref().map(|r| r.as_str()),
                %attempted,
                %location,
                "Role not allowed here, redirecting home"
            );
            record_guard_redirect("role");
            Redirect::to(&location).into_response()
        }
    }
}
