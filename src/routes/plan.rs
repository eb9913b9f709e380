use crate::models::plan_request::PlanRequest;
use crate::routes::ErrorResponse;
use crate::services::generation_service::ItineraryGeneration;
use crate::services::itinerary_service::{build_itinerary, markup_source};
use crate::services::markup_service::render_to_html;
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder};
use log::{error, info, warn};

/*
    /api/plan
*/
pub async fn plan(state: web::Data<AppState>, input: web::Json<PlanRequest>) -> impl Responder {
    let request = input.into_inner();
    let policy = &state.config.policy;

    let destination = match request.resolved_destination() {
        Ok(destination) => destination,
        Err(err) => return ErrorResponse::bad_request("invalid_request", &err.to_string()),
    };
    let days = match request.resolved_days(policy) {
        Ok(days) => days,
        Err(err) => return ErrorResponse::bad_request("invalid_request", &err.to_string()),
    };
    let email = match request.validated_email() {
        Ok(email) => email,
        Err(err) => return ErrorResponse::bad_request("invalid_email", &err.to_string()),
    };

    info!("Planning {} days in {}", days, destination);

    let output = match state.generator.generate(&request, &destination, days).await {
        Ok(output) => output,
        Err(err) => {
            error!("Itinerary generation failed for {}: {}", destination, err);
            return HttpResponse::BadGateway().json(ErrorResponse::new(
                "generation_failed",
                "Could not generate itinerary",
            ));
        }
    };

    let itinerary = match build_itinerary(&request, &output, policy) {
        Ok(itinerary) => itinerary,
        Err(err) => return ErrorResponse::bad_request("invalid_request", &err.to_string()),
    };

    if let (Some(address), Some(mailer)) = (email, state.email.as_ref()) {
        let html = render_to_html(&markup_source(&itinerary), &request.currency_format());
        match mailer
            .send_html_email(address, &itinerary.trip_title, &html)
            .await
        {
            Ok(()) => info!("Itinerary emailed to {}", address),
            Err(err) => warn!("Could not email itinerary to {}: {}", address, err),
        }
    }

    HttpResponse::Ok().json(itinerary)
}
