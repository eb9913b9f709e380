use crate::routes::ErrorResponse;
use crate::services::rates_service::normalize_currency_code;
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder};
use log::error;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RatesQuery {
    pub base: Option<String>,
}

/*
    /api/rates?base=USD
*/
pub async fn get_rates(state: web::Data<AppState>, query: web::Query<RatesQuery>) -> impl Responder {
    let base = match normalize_currency_code(query.base.as_deref().unwrap_or("USD")) {
        Some(code) => code,
        None => return ErrorResponse::bad_request("invalid_currency", "Unknown currency code"),
    };

    let service = match state.rates.as_ref() {
        Some(service) => service,
        None => {
            return HttpResponse::ServiceUnavailable().json(ErrorResponse::new(
                "rates_unavailable",
                "Currency rates are not configured",
            ))
        }
    };

    match service.latest(&base).await {
        Ok(rates) => HttpResponse::Ok().json(rates),
        Err(err) => {
            error!("Failed to fetch rates for {}: {}", base, err);
            HttpResponse::BadGateway().json(ErrorResponse::new(
                "rates_failed",
                "Failed to fetch currency rates",
            ))
        }
    }
}
