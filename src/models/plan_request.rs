use crate::config::PlannerPolicy;
use crate::services::budget_service::coerce_amount;
use crate::services::currency_format::CurrencyFormat;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").unwrap());

pub fn is_valid_email(address: &str) -> bool {
    EMAIL_RE.is_match(address.trim())
}

/// Trip planning form as submitted by the landing page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub destination: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub days: Option<usize>,
    pub travelers: Option<u32>,
    #[serde(default)]
    pub style: Vec<String>,
    pub budget_level: Option<String>,
    #[serde(rename = "budgetUSD", default, deserialize_with = "lenient_amount")]
    pub budget_usd: Option<f64>,
    pub pace: Option<String>,
    pub email: Option<String>,
    /// UI language, also used as the money formatting locale
    pub lang: Option<String>,
}

// Form fields arrive as numbers or strings; unparsable amounts become zero
fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .filter(|v| !v.is_null())
        .map(|v| coerce_amount(Some(&v))))
}

#[derive(Debug, PartialEq)]
pub enum PlanRequestError {
    MissingDestination,
    InvalidDays { requested: usize, max: usize },
    InvalidEmail(String),
}

impl fmt::Display for PlanRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanRequestError::MissingDestination => {
                write!(f, "A destination or a city/country pair is required")
            }
            PlanRequestError::InvalidDays { requested, max } => {
                write!(f, "Trip length must be between 1 and {} days, got {}", max, requested)
            }
            PlanRequestError::InvalidEmail(address) => {
                write!(f, "Invalid email address: {}", address)
            }
        }
    }
}

impl std::error::Error for PlanRequestError {}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl PlanRequest {
    /// `destination` if given, otherwise "city, country" from whichever parts are present.
    pub fn resolved_destination(&self) -> Result<String, PlanRequestError> {
        if let Some(destination) = non_blank(&self.destination) {
            return Ok(destination.to_string());
        }

        let parts: Vec<&str> = [non_blank(&self.city), non_blank(&self.country)]
            .into_iter()
            .flatten()
            .collect();

        if parts.is_empty() {
            Err(PlanRequestError::MissingDestination)
        } else {
            Ok(parts.join(", "))
        }
    }

    /// Requested trip length, with the policy default when not supplied.
    pub fn resolved_days(&self, policy: &PlannerPolicy) -> Result<usize, PlanRequestError> {
        match self.days {
            None => Ok(policy.default_days),
            Some(days) if days == 0 || days > policy.max_days => {
                Err(PlanRequestError::InvalidDays {
                    requested: days,
                    max: policy.max_days,
                })
            }
            Some(days) => Ok(days),
        }
    }

    /// The address to send to, if one was given. A malformed address is an error.
    pub fn validated_email(&self) -> Result<Option<&str>, PlanRequestError> {
        match non_blank(&self.email) {
            None => Ok(None),
            Some(address) if is_valid_email(address) => Ok(Some(address)),
            Some(address) => Err(PlanRequestError::InvalidEmail(address.to_string())),
        }
    }

    pub fn budget_level(&self) -> Option<&str> {
        non_blank(&self.budget_level)
    }

    pub fn pace(&self) -> Option<&str> {
        non_blank(&self.pace)
    }

    pub fn locale(&self) -> &str {
        non_blank(&self.lang).unwrap_or("en")
    }

    /// Formatting for `budgetUSD` amounts in the requester's language
    pub fn currency_format(&self) -> CurrencyFormat {
        CurrencyFormat::usd(self.locale())
    }
}
