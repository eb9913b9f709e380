use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^\s*```[a-zA-Z]*\s*\n(.*?)\n?\s*```\s*$").unwrap());

/// What the generation service handed back. Structured payloads are expected to look like
/// `{ title?, days?: [{ title?, location?, items? | bullets? }], budget?: { rows? } }`
/// but nothing about that shape is guaranteed.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutput {
    Structured(Value),
    Text(String),
}

impl GenerationOutput {
    /// Interprets a model reply: a JSON object (optionally inside a code fence) is
    /// structured, anything else is raw text.
    pub fn from_reply(reply: &str) -> Self {
        let candidate = FENCE_RE
            .captures(reply)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .unwrap_or(reply)
            .trim();

        match serde_json::from_str::<Value>(candidate) {
            Ok(value @ Value::Object(_)) => GenerationOutput::Structured(value),
            _ => GenerationOutput::Text(reply.trim().to_string()),
        }
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            GenerationOutput::Structured(value) => Some(value),
            GenerationOutput::Text(_) => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            GenerationOutput::Text(text) if !text.trim().is_empty() => Some(text.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_json_reply_is_structured() {
        let output = GenerationOutput::from_reply(r#"{"title": "Kyoto", "days": []}"#);
        assert_eq!(
            output,
            GenerationOutput::Structured(json!({"title": "Kyoto", "days": []}))
        );
    }

    #[test]
    fn test_fenced_json_reply_is_structured() {
        let reply = "```json\n{\"days\": [{\"title\": \"Day 1\"}]}\n```";
        let output = GenerationOutput::from_reply(reply);
        assert_eq!(output.payload().unwrap()["days"][0]["title"], "Day 1");
    }

    #[test]
    fn test_prose_and_non_object_json_are_text() {
        let output = GenerationOutput::from_reply("Day 1: Arrive\n- Check in\n");
        assert_eq!(output.text(), Some("Day 1: Arrive\n- Check in"));
        assert!(output.payload().is_none());

        let output = GenerationOutput::from_reply("[1, 2, 3]");
        assert!(matches!(output, GenerationOutput::Text(_)));
    }

    #[test]
    fn test_blank_reply_has_no_text() {
        assert_eq!(GenerationOutput::from_reply("   ").text(), None);
    }
}
