use crate::models::itinerary::Itinerary;
use crate::models::plan_request::is_valid_email;
use crate::routes::ErrorResponse;
use crate::services::currency_format::CurrencyFormat;
use crate::services::itinerary_service::markup_source;
use crate::services::markup_service::{render_to_html, MarkupSource};
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder};
use log::{error, info};
use serde::Deserialize;

const DEFAULT_SUBJECT: &str = "Your Travel Itinerary";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub itinerary: Option<Itinerary>,
    pub text: Option<String>,
    pub lang: Option<String>,
    pub currency: Option<String>,
    pub email: Option<String>,
}

impl ExportRequest {
    fn currency_format(&self) -> CurrencyFormat {
        CurrencyFormat::new(
            self.lang.as_deref().unwrap_or("en"),
            self.currency.as_deref().unwrap_or("USD"),
        )
    }

    fn trip_title(&self) -> Option<&str> {
        self.itinerary
            .as_ref()
            .map(|i| i.trip_title.trim())
            .filter(|t| !t.is_empty())
    }

    /// Structured days win; otherwise the free text is rendered as-is.
    fn render(&self) -> Option<String> {
        let format = self.currency_format();

        if let Some(itinerary) = self.itinerary.as_ref().filter(|i| !i.days.is_empty()) {
            return Some(render_to_html(&markup_source(itinerary), &format));
        }

        let text = self.text.as_deref().filter(|t| !t.trim().is_empty())?;
        let source = MarkupSource::Text {
            title: self.trip_title(),
            body: text,
        };
        Some(render_to_html(&source, &format))
    }
}

/*
    /api/itinerary/html
*/
pub async fn export_html(input: web::Json<ExportRequest>) -> impl Responder {
    match input.render() {
        Some(html) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(html),
        None => ErrorResponse::bad_request("missing_itinerary", "Provide an itinerary or text"),
    }
}

/*
    /api/itinerary/email
*/
pub async fn email_itinerary(
    state: web::Data<AppState>,
    input: web::Json<ExportRequest>,
) -> impl Responder {
    let address = match input.email.as_deref().map(str::trim) {
        Some(address) if is_valid_email(address) => address,
        _ => return ErrorResponse::bad_request("invalid_email", "A valid email address is required"),
    };

    let html = match input.render() {
        Some(html) => html,
        None => {
            return ErrorResponse::bad_request("missing_itinerary", "Provide an itinerary or text")
        }
    };

    let mailer = match state.email.as_ref() {
        Some(mailer) => mailer,
        None => {
            return HttpResponse::ServiceUnavailable().json(ErrorResponse::new(
                "email_unavailable",
                "Email delivery is not configured",
            ))
        }
    };

    let subject = input.trip_title().unwrap_or(DEFAULT_SUBJECT);

    match mailer.send_html_email(address, subject, &html).await {
        Ok(()) => {
            info!("Itinerary emailed to {}", address);
            HttpResponse::Accepted().json(serde_json::json!({ "status": "sent" }))
        }
        Err(err) => {
            error!("Error sending itinerary: {}", err);
            HttpResponse::BadGateway().json(ErrorResponse::new(
                "send_failed",
                "Failed to send itinerary email",
            ))
        }
    }
}
