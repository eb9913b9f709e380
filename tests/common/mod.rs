use actix_web::{web, App};

use trip_planner_api::config::{AppConfig, PlannerPolicy};
use trip_planner_api::routes;
use trip_planner_api::state::AppState;

// Nothing listens on the discard port, so unmocked upstream calls fail fast
pub const UNREACHABLE: &str = "http://127.0.0.1:9";

pub fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        openai_api_key: None,
        openai_base_url: UNREACHABLE.to_string(),
        openai_model: "test-model".to_string(),
        sendgrid_api_key: None,
        sendgrid_url: UNREACHABLE.to_string(),
        from_email: "planner@example.com".to_string(),
        rates_api_url: UNREACHABLE.to_string(),
        policy: PlannerPolicy::default(),
    }
}

pub struct TestApp {
    pub state: web::Data<AppState>,
}

impl TestApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            state: web::Data::new(AppState::from_config(config)),
        }
    }

    /// No model, no mail, rates unreachable.
    pub fn offline() -> Self {
        Self::new(test_config())
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.state.clone())
            .configure(routes::configure)
    }
}

pub fn completion_body(content: &str) -> String {
    serde_json::json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    })
    .to_string()
}
