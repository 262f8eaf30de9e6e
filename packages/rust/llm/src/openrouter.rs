//! OpenRouter chat-completions client.

use std::time::Duration;

use async_trait::async_trait;
use preprint_shared::{OpenRouterConfig, PreprintError, Result};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::ChatModel;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

// ---------------------------------------------------------------------------
// OpenRouterClient
// ---------------------------------------------------------------------------

/// [`ChatModel`] backed by the OpenRouter API.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl OpenRouterClient {
    /// Build a client with the given API key and `[openrouter]` settings.
    pub fn new(api_key: &str, config: &OpenRouterConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .default_headers(default_headers(api_key, config)?)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PreprintError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    /// The model identifier sent with every request.
    pub fn model(&self) -> &str {
        &self.model
    }
}

fn default_headers(api_key: &str, config: &OpenRouterConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
        .map_err(|_| PreprintError::config("API key contains invalid header characters"))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    if let Ok(val) = HeaderValue::from_str(&config.site_url) {
        headers.insert("HTTP-Referer", val);
    }
    if let Ok(val) = HeaderValue::from_str(&config.app_name) {
        headers.insert("X-Title", val);
    }

    Ok(headers)
}

#[async_trait]
impl ChatModel for OpenRouterClient {
    #[instrument(skip_all, fields(model = %self.model))]
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: [
                Message {
                    role: "system",
                    content: system,
                },
                Message {
                    role: "user",
                    content: user,
                },
            ],
        };

        debug!(user_chars = user.len(), "chat request");

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| PreprintError::Llm(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PreprintError::Llm(format!("OpenRouter API error ({status}): {body}")));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| PreprintError::Llm(format!("invalid response body: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| PreprintError::Llm("no response content from OpenRouter".into()))
    }
}
