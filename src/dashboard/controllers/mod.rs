pub mod health;
pub mod results;
pub mod sites;

use actix_web::HttpResponse;
use actix_web::http::header;

fn redirect_home() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .finish()
}
