//! Itinerary generation through an OpenAI-compatible chat completion API.
//!
//! Without an API key the planner runs offline: the generator returns an empty
//! payload and the normalization pipeline synthesizes the whole plan.

use crate::config::AppConfig;
use crate::models::generation::GenerationOutput;
use crate::models::plan_request::PlanRequest;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 60;
const TEMPERATURE: f32 = 0.7;

const SYSTEM_PROMPT: &str = "You are a travel planner. Reply with JSON only, shaped as \
{\"title\": string, \"days\": [{\"title\": string, \"location\": string, \"items\": [string]}], \
\"budget\": {\"rows\": [{\"category\": string, \"budget\": number, \"mid\": number, \"luxury\": number}]}}. \
Activity items may start with \"Morning:\", \"Afternoon:\" or \"Evening:\" and a day may include one \
item starting with \"Local tip:\". Use **bold** sparingly.";

#[derive(Debug)]
pub enum GenerationError {
    Request(String),
    Api(String),
    Decode(String),
}

impl std::fmt::Display for GenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationError::Request(err) => write!(f, "Request error: {}", err),
            GenerationError::Api(err) => write!(f, "API error: {}", err),
            GenerationError::Decode(err) => write!(f, "Decode error: {}", err),
        }
    }
}

impl std::error::Error for GenerationError {}

pub trait ItineraryGeneration {
    async fn generate(
        &self,
        request: &PlanRequest,
        destination: &str,
        days: usize,
    ) -> Result<GenerationOutput, GenerationError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// The user message describing the trip.
pub fn build_prompt(request: &PlanRequest, destination: &str, days: usize) -> String {
    let mut lines = vec![format!(
        "Plan a {}-day trip to {}. Return exactly {} entries in \"days\".",
        days, destination, days
    )];

    if let Some(start) = request.start_date {
        lines.push(format!("The trip starts on {}.", start.format("%Y-%m-%d")));
    }
    if let Some(travelers) = request.travelers {
        lines.push(format!("Travelers: {}.", travelers));
    }
    let styles: Vec<&str> = request
        .style
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if !styles.is_empty() {
        lines.push(format!("Travel style: {}.", styles.join(", ")));
    }
    if let Some(level) = request.budget_level() {
        lines.push(format!("Budget level: {}.", level));
    }
    if let Some(amount) = request.budget_usd.filter(|a| *a > 0.0) {
        lines.push(format!("Total budget: about {:.0} USD.", amount));
    }
    if let Some(pace) = request.pace() {
        lines.push(format!("Pace: {}.", pace));
    }
    lines.push(format!("Write in the language with code \"{}\".", request.locale()));

    lines.join("\n")
}

pub struct LlmGenerator {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl LlmGenerator {
    pub fn new(api_key: &str, base_url: &str, model: &str) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }
}

impl ItineraryGeneration for LlmGenerator {
    async fn generate(
        &self,
        request: &PlanRequest,
        destination: &str,
        days: usize,
    ) -> Result<GenerationOutput, GenerationError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_prompt(request, destination, days),
                },
            ],
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GenerationError::Api(format!(
                "Status: {}, Body: {}",
                status, body
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Decode(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| GenerationError::Decode("Completion has no content".to_string()))?;

        let output = GenerationOutput::from_reply(&content);
        if output.payload().is_none() {
            warn!("Model reply for {} was not JSON, keeping it as text", destination);
        }
        Ok(output)
    }
}

/// Used when no model is configured.
pub struct OfflineGenerator;

impl ItineraryGeneration for OfflineGenerator {
    async fn generate(
        &self,
        _request: &PlanRequest,
        destination: &str,
        _days: usize,
    ) -> Result<GenerationOutput, GenerationError> {
        info!("No model configured, planning {} offline", destination);
        Ok(GenerationOutput::Structured(json!({})))
    }
}

pub enum Generator {
    Llm(LlmGenerator),
    Offline(OfflineGenerator),
}

impl Generator {
    pub fn from_config(config: &AppConfig) -> Self {
        let Some(api_key) = config.openai_api_key.as_deref() else {
            return Generator::Offline(OfflineGenerator);
        };

        match LlmGenerator::new(api_key, &config.openai_base_url, &config.openai_model) {
            Ok(generator) => {
                info!("Itinerary generation using model {}", config.openai_model);
                Generator::Llm(generator)
            }
            Err(e) => {
                warn!("Model client unavailable: {}. Falling back to offline planning.", e);
                Generator::Offline(OfflineGenerator)
            }
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, Generator::Llm(_))
    }
}

impl ItineraryGeneration for Generator {
    async fn generate(
        &self,
        request: &PlanRequest,
        destination: &str,
        days: usize,
    ) -> Result<GenerationOutput, GenerationError> {
        match self {
            Generator::Llm(generator) => generator.generate(request, destination, days).await,
            Generator::Offline(generator) => generator.generate(request, destination, days).await,
        }
    }
}
