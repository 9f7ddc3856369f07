use axum::{routing::get, Json, Router};
use core_config::AppInfo;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub name: &'static str,
    pub version: &'static str,
}

/// Router exposing `/health` with the application's identity.
///
/// Mounted outside `/api` so probes don't pass through auth middleware.
pub fn health_router(app: AppInfo) -> Router {
    Router::new().route(
        "/health",
        get(move || async move {
            Json(HealthResponse {
                status: "ok",
                name: app.name,
                version: app.version,
            })
        }),
    )
}
