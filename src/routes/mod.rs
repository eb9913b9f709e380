use actix_web::{web, HttpResponse};
use serde::Serialize;

pub mod health;
pub mod itinerary;
pub mod plan;
pub mod rates;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: &str, message: &str) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
        }
    }

    pub fn bad_request(error: &str, message: &str) -> HttpResponse {
        HttpResponse::BadRequest().json(Self::new(error, message))
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check)).service(
        web::scope("/api")
            .route("/plan", web::post().to(plan::plan))
            .route("/rates", web::get().to(rates::get_rates))
            .service(
                web::scope("/itinerary")
                    .route("/html", web::post().to(itinerary::export_html))
                    .route("/email", web::post().to(itinerary::email_itinerary)),
            ),
    );
}
