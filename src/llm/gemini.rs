//! Gemini API client implementation
//!
//! This module implements the TextGenerator trait for the Google Gemini API.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use crate::error::{Result, ScenegenError};
use crate::llm::client::TextGenerator;
use crate::llm::types::{FinishReason, GenerationRequest, GenerationResponse, Usage};

/// Gemini API base URL
const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variable holding the API key
const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default model to use
const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-05-20";

/// Default max output tokens
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 8192;

/// Configuration for the Gemini client
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub model: String,
    pub max_output_tokens: u32,
    pub timeout: Duration,
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            timeout: Duration::from_secs(300),
            base_url: GEMINI_API_URL.to_string(),
        }
    }
}

impl GeminiConfig {
    /// Create a new config with a specific model
    pub fn with_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }
}

/// Gemini API client
pub struct GeminiClient {
    client: Client,
    api_key: String,
    config: GeminiConfig,
    usage: Arc<Mutex<Usage>>,
}

impl GeminiClient {
    /// Create a new Gemini client
    ///
    /// Reads GEMINI_API_KEY from environment
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key =
            std::env::var(GEMINI_API_KEY_ENV).map_err(|_| ScenegenError::MissingApiKey {
                env_var: GEMINI_API_KEY_ENV.to_string(),
            })?;

        Self::with_api_key(api_key, config)
    }

    /// Create a client with an explicit API key
    pub fn with_api_key(api_key: String, config: GeminiConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            api_key,
            config,
            usage: Arc::new(Mutex::new(Usage::default())),
        })
    }

    /// URL for a generateContent call against the given model
    fn request_url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.config.base_url, model)
    }

    /// Build the request body for the Gemini API
    fn build_request(&self, request: &GenerationRequest) -> Value {
        let max_output_tokens = request
            .max_output_tokens
            .unwrap_or(self.config.max_output_tokens);

        let mut body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.contents }]
            }],
            "generationConfig": {
                "maxOutputTokens": max_output_tokens
            }
        });

        // Add system instruction if present
        if !request.system_instruction.is_empty() {
            body["system_instruction"] = json!({
                "parts": [{ "text": request.system_instruction }]
            });
        }

        body
    }

    /// Parse the API response into a GenerationResponse
    fn parse_response(&self, body: Value) -> Result<GenerationResponse> {
        // Extract usage
        let usage = if let Some(u) = body.get("usageMetadata") {
            Usage::new(
                u["promptTokenCount"].as_u64().unwrap_or(0),
                u["candidatesTokenCount"].as_u64().unwrap_or(0),
            )
        } else {
            Usage::default()
        };

        // Track cumulative usage
        {
            let mut total = self.usage.lock().unwrap();
            total.add(&usage);
        }

        let candidates = body["candidates"].as_array();
        let Some(candidate) = candidates.and_then(|c| c.first()) else {
            // Blocked prompts come back with feedback instead of candidates
            if let Some(reason) = body["promptFeedback"]["blockReason"].as_str() {
                return Err(ScenegenError::InvalidResponse(format!(
                    "prompt blocked: {}",
                    reason
                )));
            }
            return Err(ScenegenError::EmptyResponse);
        };

        let finish_reason = candidate["finishReason"]
            .as_str()
            .map(FinishReason::from_api)
            .unwrap_or_default();

        // Parts are fragments of a single reply, concatenated as-is
        let mut text = String::new();
        if let Some(parts) = candidate["content"]["parts"].as_array() {
            for part in parts {
                if let Some(t) = part["text"].as_str() {
                    text.push_str(t);
                }
            }
        }

        if text.is_empty() {
            return Err(ScenegenError::EmptyResponse);
        }

        Ok(GenerationResponse {
            text,
            finish_reason,
            usage,
        })
    }

    /// Send a request to the Gemini API
    async fn send_request(&self, url: &str, body: Value) -> Result<Value> {
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        // Rate limits are surfaced, not retried
        if status.as_u16() == 429 {
            let retry_after_secs = response
                .headers()
                .get("retry-after")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(ScenegenError::RateLimited { retry_after_secs });
        }

        // Handle other errors
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ScenegenError::Api {
                status: status.as_u16(),
                message: error_body,
            });
        }

        Ok(response.json().await?)
    }

    /// Get cumulative token usage
    pub fn total_usage(&self) -> Usage {
        self.usage.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse> {
        let model = request.model.as_deref().unwrap_or(&self.config.model);
        let url = self.request_url(model);
        let body = self.build_request(&request);
        let response = self.send_request(&url, body).await?;
        self.parse_response(response)
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn is_ready(&self) -> bool {
        !self.api_key.is_empty()
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.config.model)
            .field("max_output_tokens", &self.config.max_output_tokens)
            .finish()
    }
}
