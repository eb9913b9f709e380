use crate::config::AppConfig;
use crate::services::email_service::EmailService;
use crate::services::generation_service::Generator;
use crate::services::rates_service::RatesService;
use log::warn;

/// Shared handles for request handlers. Built once at startup.
pub struct AppState {
    pub config: AppConfig,
    pub generator: Generator,
    pub email: Option<EmailService>,
    pub rates: Option<RatesService>,
}

impl AppState {
    pub fn from_config(config: AppConfig) -> Self {
        let generator = Generator::from_config(&config);

        let email = match EmailService::new(
            config.sendgrid_api_key.as_deref(),
            &config.from_email,
            &config.sendgrid_url,
        ) {
            Ok(service) => Some(service),
            Err(e) => {
                warn!("Email delivery disabled: {}", e);
                None
            }
        };

        let rates = match RatesService::new(&config.rates_api_url) {
            Ok(service) => Some(service),
            Err(e) => {
                warn!("Currency rates disabled: {}", e);
                None
            }
        };

        Self {
            config,
            generator,
            email,
            rates,
        }
    }
}
