use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use tracing::{info, warn};

use super::redirect_home;
use crate::dashboard::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddSiteForm {
    #[serde(rename = "newUrl")]
    pub new_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveSiteQuery {
    pub url: Option<String>,
}

// Register a new site; malformed or duplicate URLs are ignored
pub async fn add_site(data: web::Data<AppState>, form: web::Form<AddSiteForm>) -> impl Responder {
    let new_url = form.into_inner().new_url.unwrap_or_default();
    info!("Request to add site: {}", new_url.trim());

    if !data.registry.add(&new_url).await {
        warn!("Site not added (malformed or duplicate): {}", new_url.trim());
    }

    redirect_home()
}

// Remove a site from monitoring
pub async fn remove_site(
    data: web::Data<AppState>,
    query: web::Query<RemoveSiteQuery>,
) -> impl Responder {
    if let Some(url) = query.into_inner().url.filter(|u| !u.is_empty()) {
        info!("Request to remove site: {}", url);
        data.registry.remove(&url).await;
    }

    redirect_home()
}

// List all registered sites
pub async fn list_sites(data: web::Data<AppState>) -> impl Responder {
    let sites = data.registry.list().await;
    info!("Returning list of {} sites", sites.len());

    HttpResponse::Ok().json(sites)
}
