use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post},
    Router,
};
use dossier_core::guard::RouteAccess;
use dossier_core::Role;
use time::Duration;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::SessionSettings;
use crate::handlers::{
    agents::{assignable_agents, create_agent, delete_agent, list_agents, toggle_activation},
    app::{dashboard_operateur, fallback, health_check, index},
    auth::{login_handler, login_page, logout_handler},
    demande::create_demande,
    dossiers::{export_all, export_my_dossiers, list_all, my_dossiers},
    metrics::metrics,
    profile::{change_password, get_profile, update_profile, upload_avatar},
    tasks::{claim_next, my_tasks},
    workload::{bulk_reassign, journal, run_dispatch, workload, workload_export},
};
use crate::middleware::{
    guard::guard_middleware, metrics::metrics_middleware, request_id::request_id_middleware,
};
use crate::AppState;

/// Case documents and avatars go through the console.
const UPLOAD_LIMIT_BYTES: usize = 20 * 1024 * 1024;

/// Routes behind the guard for `access`.
fn guarded(routes: Router<AppState>, access: RouteAccess) -> Router<AppState> {
    routes.route_layer(from_fn_with_state(access, guard_middleware))
}

fn supervisor_routes() -> Router<AppState> {
    Router::new()
        .route("/agents", get(list_agents).post(create_agent))
        .route("/agents/assignable", get(assignable_agents))
        .route("/agents/workload", get(workload))
        .route("/agents/workload.csv", get(workload_export))
        .route("/agents/:id", delete(delete_agent))
        .route("/agents/:id/toggle-activation", post(toggle_activation))
        .route("/dispatch/journal", get(journal))
        .route("/dispatch/run", post(run_dispatch))
        .route("/dossiers", get(list_all))
        .route("/dossiers.csv", get(export_all))
        .route("/dossiers/bulk-reassign", post(bulk_reassign))
}

fn agent_routes() -> Router<AppState> {
    Router::new()
        .route("/agent/dossiers", get(my_dossiers))
        .route("/agent/dossiers.csv", get(export_my_dossiers))
        .route("/agent/tasks", get(my_tasks))
        .route("/agent/tasks/next", post(claim_next))
        .route("/demande/nouvelle", post(create_demande))
}

fn operator_routes() -> Router<AppState> {
    Router::new().route("/dashboard-operateur", get(dashboard_operateur))
}

fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/profile/avatar", post(upload_avatar))
        .route("/profile/password", post(change_password))
}

pub fn build_router(state: AppState, session_settings: &SessionSettings) -> Router {
    // Session setup
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(session_settings.secure_cookie)
        .with_expiry(Expiry::OnInactivity(Duration::hours(
            session_settings.expiry_hours,
        )));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/login", get(login_page).post(login_handler))
        .route("/logout", get(logout_handler))
        .merge(guarded(
            supervisor_routes(),
            RouteAccess::roles([Role::Superviseur]),
        ))
        .merge(guarded(agent_routes(), RouteAccess::roles([Role::Agent])))
        .merge(guarded(
            operator_routes(),
            RouteAccess::roles([Role::Importateur, Role::Operateur]),
        ))
        .merge(guarded(profile_routes(), RouteAccess::authenticated()))
        .fallback(fallback)
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES))
        .layer(session_layer)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
