//! Generation API client.
//!
//! [`GenerativeBackend`] is the seam the pipeline talks to; [`GeminiClient`]
//! is the HTTP implementation against the Google Generative Language
//! `generateContent` endpoint.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AiConfig;

/// Which model a single generation call is addressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelTarget {
    Named(String),
    /// No explicit model; the client falls back to its configured default.
    ServiceDefault,
}

impl fmt::Display for ModelTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelTarget::Named(model) => write!(f, "{}", model),
            ModelTarget::ServiceDefault => write!(f, "<service default>"),
        }
    }
}

/// Sampling parameters sent as `generationConfig`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
}

/// Everything one call sends besides the model name.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateContent {
    pub user_text: String,
    pub system_instruction: Option<String>,
    pub sampling: SamplingConfig,
}

/// Text returned by the model, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawModelResponse {
    pub text: Option<String>,
}

impl RawModelResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    pub fn empty() -> Self {
        Self { text: None }
    }

    /// The response text when it holds anything besides whitespace.
    pub fn usable_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// Failure of a single generation call.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// Failure to construct a client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("API key missing. Set GOOGLE_GENAI_API_KEY or add ai.api_key to the config file")]
    MissingApiKey,

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// A service that turns a prompt into model text.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate(
        &self,
        target: &ModelTarget,
        content: &GenerateContent,
    ) -> Result<RawModelResponse, ApiError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent<'a>>,
    generation_config: &'a SamplingConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
    status: Option<String>,
}

impl GeminiResponse {
    fn into_text(self) -> Option<String> {
        let parts = self.candidates.into_iter().next()?.content?.parts;
        let text: String = parts.into_iter().filter_map(|p| p.text).collect();
        Some(text)
    }
}

/// HTTP client for the Generative Language API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    api_key: String,
    default_model: String,
}

impl GeminiClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        default_model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ClientError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sitegen/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
            default_model: default_model.into(),
        })
    }

    pub fn from_config(config: &AiConfig) -> Result<Self, ClientError> {
        Self::new(
            config.api_url.clone(),
            config.api_key.clone(),
            config.default_model.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    fn url_for(&self, target: &ModelTarget) -> String {
        let model = match target {
            ModelTarget::Named(model) => model.as_str(),
            ModelTarget::ServiceDefault => self.default_model.as_str(),
        };
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            model.trim_start_matches("models/")
        )
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate(
        &self,
        target: &ModelTarget,
        content: &GenerateContent,
    ) -> Result<RawModelResponse, ApiError> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user"),
                parts: vec![GeminiPart {
                    text: &content.user_text,
                }],
            }],
            system_instruction: content.system_instruction.as_deref().map(|text| GeminiContent {
                role: None,
                parts: vec![GeminiPart { text }],
            }),
            generation_config: &content.sampling,
        };

        let url = self.url_for(target);
        debug!(%url, "sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = match serde_json::from_str::<GeminiErrorBody>(&body) {
                Ok(parsed) => match parsed.error.status {
                    Some(code) => format!("{} ({})", parsed.error.message, code),
                    None => parsed.error.message,
                },
                Err(_) => body,
            };
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GeminiResponse = response.json().await?;
        Ok(RawModelResponse {
            text: parsed.into_text(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GeminiClient {
        GeminiClient::new(
            "https://example.test/",
            "key",
            "gemini-2.5-flash",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_missing_api_key_is_typed_error() {
        let err = GeminiClient::new("https://x", "  ", "m", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ClientError::MissingApiKey));
    }

    #[test]
    fn test_url_strips_models_prefix() {
        let url = client().url_for(&ModelTarget::Named("models/gemini-pro".to_string()));
        assert_eq!(
            url,
            "https://example.test/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[test]
    fn test_service_default_uses_configured_model() {
        let url = client().url_for(&ModelTarget::ServiceDefault);
        assert!(url.ends_with("/models/gemini-2.5-flash:generateContent"));
    }

    #[test]
    fn test_usable_text_ignores_whitespace() {
        assert_eq!(RawModelResponse::from_text("  \n").usable_text(), None);
        assert_eq!(RawModelResponse::empty().usable_text(), None);
        assert_eq!(RawModelResponse::from_text("{}").usable_text(), Some("{}"));
    }

    #[test]
    fn test_response_text_joins_parts() {
        let body = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"{\"a\":"},{"text":"1}"}]},"finishReason":"STOP"}]}"#;
        let parsed: GeminiResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.into_text().as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_no_candidates_means_no_text() {
        let parsed: GeminiResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        assert_eq!(parsed.into_text(), None);
    }

    #[test]
    fn test_sampling_config_wire_names() {
        let sampling = SamplingConfig {
            temperature: 0.5,
            max_output_tokens: 100,
            top_p: None,
            top_k: Some(40),
        };
        let value = serde_json::to_value(&sampling).unwrap();
        assert_eq!(value["maxOutputTokens"], 100);
        assert_eq!(value["topK"], 40);
        assert!(value.get("topP").is_none());
    }
}
