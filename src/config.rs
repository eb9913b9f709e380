use std::env;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OPENAI_MODEL: &str = "gpt-4o-mini";
const FROM_EMAIL: &str = "noreply@tripplanner.app";
const SENDGRID_URL: &str = "https://api.sendgrid.com/v3/mail/send";
const RATES_API_URL: &str = "https://open.er-api.com/v6/latest";

const DEFAULT_DAYS: usize = 5;
const MAX_DAYS: usize = 30;
const BUDGET_TIER_MAX: f64 = 1500.0;
const MIDRANGE_TIER_MAX: f64 = 4000.0;

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub sendgrid_api_key: Option<String>,
    pub sendgrid_url: String,
    pub from_email: String,
    pub rates_api_url: String,
    pub policy: PlannerPolicy,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| HOST.to_string()),
            port: env_or("PORT", PORT),
            openai_api_key: env_non_empty("OPENAI_API_KEY"),
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| OPENAI_BASE_URL.to_string()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| OPENAI_MODEL.to_string()),
            sendgrid_api_key: env_non_empty("SENDGRID_API_KEY"),
            sendgrid_url: env::var("SENDGRID_API_URL").unwrap_or_else(|_| SENDGRID_URL.to_string()),
            from_email: env::var("FROM_EMAIL").unwrap_or_else(|_| FROM_EMAIL.to_string()),
            rates_api_url: env::var("RATES_API_URL").unwrap_or_else(|_| RATES_API_URL.to_string()),
            policy: PlannerPolicy::from_env(),
        }
    }
}

/// Upper bounds (inclusive) of the budget and mid-range tiers, in USD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierThresholds {
    pub budget_max: f64,
    pub mid_range_max: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            budget_max: BUDGET_TIER_MAX,
            mid_range_max: MIDRANGE_TIER_MAX,
        }
    }
}

/// Content used for synthesized days when the generated plan is short.
#[derive(Debug, Clone, PartialEq)]
pub struct FillerTemplate {
    /// `{destination}` is substituted with the trip destination
    pub title_suffix: String,
    pub activities: Vec<String>,
}

impl Default for FillerTemplate {
    fn default() -> Self {
        Self {
            title_suffix: "Highlights in {destination}".to_string(),
            activities: vec![
                "Morning: Iconic landmark visit".to_string(),
                "Afternoon: Local market & museum".to_string(),
                "Evening: Neighborhood stroll & dinner".to_string(),
            ],
        }
    }
}

impl FillerTemplate {
    pub fn title_suffix_for(&self, destination: &str) -> String {
        self.title_suffix.replace("{destination}", destination)
    }
}

/// Policy values for itinerary normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerPolicy {
    pub default_days: usize,
    pub max_days: usize,
    pub tier_thresholds: TierThresholds,
    pub filler: FillerTemplate,
}

impl Default for PlannerPolicy {
    fn default() -> Self {
        Self {
            default_days: DEFAULT_DAYS,
            max_days: MAX_DAYS,
            tier_thresholds: TierThresholds::default(),
            filler: FillerTemplate::default(),
        }
    }
}

impl PlannerPolicy {
    /// Create a policy from environment variables or use defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            default_days: env_or("PLANNER_DEFAULT_DAYS", defaults.default_days).max(1),
            max_days: env_or("PLANNER_MAX_DAYS", defaults.max_days).max(1),
            tier_thresholds: TierThresholds {
                budget_max: env_or("BUDGET_TIER_MAX", defaults.tier_thresholds.budget_max),
                mid_range_max: env_or(
                    "MIDRANGE_TIER_MAX",
                    defaults.tier_thresholds.mid_range_max,
                ),
            },
            filler: defaults.filler,
        }
    }
}
