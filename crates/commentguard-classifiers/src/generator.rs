//! Remote text generation capability
//!
//! The remote classifier only needs "send a prompt, receive text". The
//! [`TextGenerator`] trait captures that, and [`GeminiClient`] implements it
//! against the Gemini `generateContent` REST endpoint.

use async_trait::async_trait;
use commentguard_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default Gemini REST base URL
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model used for moderation
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

/// A remote text-generation service
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a text reply for `prompt`. Fails on network, auth or quota
    /// problems.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Name of the backing model
    fn model(&self) -> &str;
}

/// Settings for [`GeminiClient`]
#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl GeminiSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Gemini `generateContent` client
pub struct GeminiClient {
    client: reqwest::Client,
    settings: GeminiSettings,
}

impl GeminiClient {
    /// Create a client. An empty API key is a configuration error.
    pub fn new(settings: GeminiSettings) -> Result<Self> {
        if settings.api_key.trim().is_empty() {
            return Err(Error::config(
                "Gemini API key not provided. Set GEMINI_API_KEY in .env file or pass directly.",
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, settings })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.settings.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::remote(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::remote(format!("HTTP {status}: {body}")));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::remote(format!("invalid response body: {e}")))?;

        let text = body.text().ok_or_else(|| {
            Error::remote("response contained no candidate text".to_string())
        })?;

        debug!(model = %self.settings.model, chars = text.len(), "Gemini reply received");
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.settings.model
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        (!text.is_empty()).then_some(text)
    }
}
