use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;

use super::{GenerateOptions, GenerationError, TextGenerator};

const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationSettings,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationSettings {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Blocking client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn from_config(config: &GenerationConfig) -> Result<Self, GenerationError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(api_key_from_env)
            .ok_or(GenerationError::MissingApiKey)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

fn api_key_from_env() -> Option<String> {
    API_KEY_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|key| !key.trim().is_empty())
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String, GenerationError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationSettings {
                temperature: options.temperature,
            },
        };
        tracing::info!(model = %self.model, temperature = options.temperature, "sending generation request");

        let resp = self
            .client
            .post(self.url())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }
        parse_response(&resp.text()?)
    }
}

fn parse_response(body: &str) -> Result<String, GenerationError> {
    let parsed: GenerateContentResponse =
        serde_json::from_str(body).map_err(|err| GenerationError::Malformed(err.to_string()))?;
    Ok(collect_text(parsed))
}

fn collect_text(resp: GenerateContentResponse) -> String {
    resp.candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_uses_api_field_names() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: "hi" }],
            }],
            generation_config: GenerationSettings { temperature: 0.5 },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(json["generationConfig"]["temperature"], 0.5);
    }

    #[test]
    fn collects_text_parts_of_first_candidate() {
        let raw = r####"{"candidates":[{"content":{"parts":[{"text":"### GHERKIN"},{"text":" SCENARIOS"}]}},{"content":{"parts":[{"text":"ignored"}]}}]}"####;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(collect_text(parsed), "### GHERKIN SCENARIOS");
    }

    #[test]
    fn undecodable_body_is_malformed() {
        let err = parse_response("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, GenerationError::Malformed(_)));
        assert_eq!(parse_response(r#"{"candidates":[]}"#).unwrap(), "");
    }

    #[test]
    fn missing_candidates_yield_empty_text() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(collect_text(parsed), "");
    }

    #[test]
    fn explicit_key_builds_client() {
        let config = GenerationConfig {
            api_key: Some("test-key".to_string()),
            endpoint: "https://example.invalid/v1beta/".to_string(),
            ..Default::default()
        };
        let client = GeminiClient::from_config(&config).unwrap();
        assert_eq!(
            client.url(),
            "https://example.invalid/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }
}
