use actix_web::http::header;
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use std::io::ErrorKind;
use tracing::{error, info};

use super::redirect_home;
use crate::dashboard::state::AppState;
use crate::dashboard::view::{DashboardPage, render_dashboard};
use crate::measurement::{Measurement, mean_load_time, round_to};

#[derive(Debug, Deserialize)]
pub struct ResultsQuery {
    pub limit: Option<usize>,
}

/// The latest results, one per registered site
async fn latest_results(data: &AppState, limit: usize) -> Vec<Measurement> {
    let store = data.store.clone();
    match web::block(move || store.read_latest(limit)).await {
        Ok(Ok(results)) => results,
        Ok(Err(e)) => {
            error!("Failed to read results: {}", e);
            Vec::new()
        }
        Err(e) => {
            error!("Results reader task failed: {}", e);
            Vec::new()
        }
    }
}

pub async fn index(data: web::Data<AppState>) -> impl Responder {
    let sites = data.registry.list().await;
    let results = latest_results(&data, sites.len()).await;
    let average_load_time = mean_load_time(&results).map(|avg| round_to(avg, 3));

    let html = render_dashboard(&DashboardPage {
        sites: &sites,
        results: &results,
        average_load_time,
        alert_threshold: data.alert_threshold(),
    });

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

// Trigger a monitoring run over the current site list
pub async fn run_monitoring(data: web::Data<AppState>) -> impl Responder {
    let sites = data.registry.list().await;
    info!("Request to run monitoring over {} sites", sites.len());

    match data.monitor.run(&sites).await {
        Ok(report) => {
            info!(
                "Run {} finished with {} measurements",
                report.run_id,
                report.measurements.len()
            );
            redirect_home()
        }
        Err(e) => {
            error!("Monitoring run failed: {}", e);
            HttpResponse::InternalServerError()
                .content_type("text/plain; charset=utf-8")
                .body(format!("Monitoring run failed: {}", e))
        }
    }
}

// Stream the raw measurement log
pub async fn download_results(data: web::Data<AppState>) -> impl Responder {
    match tokio::fs::read(data.store.path()).await {
        Ok(bytes) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"results.csv\"",
            ))
            .body(bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            HttpResponse::NotFound().body("No report available.")
        }
        Err(e) => {
            error!("Failed to read results for download: {}", e);
            HttpResponse::InternalServerError().body("Failed to read report.")
        }
    }
}

// Latest results as JSON; defaults to one per registered site
pub async fn list_results(
    data: web::Data<AppState>,
    query: web::Query<ResultsQuery>,
) -> impl Responder {
    let limit = match query.limit {
        Some(limit) => limit,
        None => data.registry.len().await,
    };
    let results = latest_results(&data, limit).await;
    info!("Returning {} results", results.len());

    HttpResponse::Ok().json(results)
}
