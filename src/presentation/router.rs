// Route table - one route group per dashboard page
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::*;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>, base_path: &str) -> Router {
    let routes = Router::new()
        .route("/", get(get_dashboard))
        .route("/healthz", get(health_check))
        .route("/modules", get(list_modules))
        .route("/modules/:slug/records", get(list_records).post(stage_add))
        .route("/modules/:slug/records/:id", axum::routing::put(stage_edit).delete(stage_remove))
        .route("/modules/:slug/records/:id/status", post(stage_status))
        .route("/modules/:slug/confirm/:ticket", post(confirm_pending))
        .route("/modules/:slug/decline/:ticket", post(decline_pending))
        .route("/realtime", get(realtime_latest))
        .route("/realtime/stream", get(realtime_stream))
        .route("/history/:dock", get(dock_history))
        .route("/remote-control/confirm/:ticket", post(confirm_device_toggle))
        .route("/remote-control/decline/:ticket", post(decline_device_toggle))
        .route("/remote-control/:dock", get(dock_devices))
        .route("/remote-control/:dock/:device", post(stage_device_toggle))
        .with_state(state);

    let router = if base_path == "/" {
        routes
    } else {
        Router::new().nest(base_path, routes)
    };

    router.fallback(not_found).layer(TraceLayer::new_for_http())
}
