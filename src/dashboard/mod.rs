//! Web dashboard: view and edit the site list, trigger runs, download results

pub mod controllers;
pub mod state;
pub mod view;

use actix_web::{web, App, HttpServer};
use tracing::info;

use controllers::{health, results, sites};
pub use state::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(results::index))
        .route("/add", web::post().to(sites::add_site))
        .route("/remove", web::get().to(sites::remove_site))
        .route("/run", web::post().to(results::run_monitoring))
        .route("/download", web::get().to(results::download_results))
        .route("/health", web::get().to(health::health_check))
        .route("/api/sites", web::get().to(sites::list_sites))
        .route("/api/results", web::get().to(results::list_results));
}

pub async fn serve(state: web::Data<AppState>, bind_address: &str, port: u16) -> std::io::Result<()> {
    info!("UI available at http://{}:{}", bind_address, port);

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind((bind_address, port))?
        .run()
        .await
}
