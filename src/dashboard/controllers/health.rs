use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;

use crate::dashboard::AppState;

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: &'static str,
    sites: usize,
    results_file: String,
    has_results: bool,
}

/// Liveness plus a glance at the registry and the measurement log
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthStatus {
        status: "OK",
        sites: state.registry.len().await,
        results_file: state.store.path().display().to_string(),
        has_results: state.store.exists(),
    })
}
