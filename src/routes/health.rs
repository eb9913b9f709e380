use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::BTreeMap;
use std::env;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: BTreeMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

impl ServiceStatus {
    fn ok(details: String) -> Self {
        Self {
            status: "ok".to_string(),
            details: Some(details),
        }
    }

    fn error(details: &str) -> Self {
        Self {
            status: "error".to_string(),
            details: Some(details.to_string()),
        }
    }
}

pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: BTreeMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    health
        .services
        .insert("generation".to_string(), check_generation(&state));
    health
        .services
        .insert("email".to_string(), check_email(&state));
    health
        .services
        .insert("rates".to_string(), check_rates(&state));

    // Any service that is not ok makes the overall status degraded
    if health.services.values().any(|s| s.status != "ok") {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

fn check_generation(state: &AppState) -> ServiceStatus {
    if state.generator.is_online() {
        ServiceStatus::ok(format!("Model {} configured", state.config.openai_model))
    } else {
        ServiceStatus::error("OPENAI_API_KEY not configured, planning offline")
    }
}

fn check_email(state: &AppState) -> ServiceStatus {
    match state.config.sendgrid_api_key.as_deref() {
        Some(key) if state.email.is_some() => {
            let masked_key = if key.is_ascii() && key.len() > 8 {
                format!("{}***{}", &key[0..4], &key[key.len() - 4..])
            } else {
                "***".to_string()
            };
            ServiceStatus::ok(format!("SendGrid API key configured ({})", masked_key))
        }
        _ => ServiceStatus::error("SENDGRID_API_KEY not configured"),
    }
}

fn check_rates(state: &AppState) -> ServiceStatus {
    if state.rates.is_some() {
        ServiceStatus::ok(format!("Rates from {}", state.config.rates_api_url))
    } else {
        ServiceStatus::error("Rates client failed to initialize")
    }
}
