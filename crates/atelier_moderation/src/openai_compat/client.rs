//! Client for OpenAI-compatible chat completion APIs.

use crate::openai_compat::{ChatCompletionError, ChatRequest, ChatResponse};
use async_trait::async_trait;
use atelier_core::ClassifierConfig;
use atelier_error::ConfigError;
use reqwest::Client;
use tracing::{debug, error, instrument};

/// Anything that can answer a chat completion request with text.
///
/// The safety classifier depends on this seam rather than on HTTP directly.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Send the request and return the first choice's message text.
    async fn complete(&self, request: &ChatRequest) -> Result<String, ChatCompletionError>;
}

/// Generic client for any OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAICompatibleClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAICompatibleClient {
    /// Creates a new client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - API key for bearer authentication
    /// * `base_url` - Full URL of the chat completions endpoint
    #[instrument(skip(api_key), fields(url = %base_url))]
    pub fn new(api_key: String, base_url: String) -> Self {
        debug!(url = %base_url, "Created OpenAI-compatible client");
        Self {
            client: Client::new(),
            api_key,
            base_url,
        }
    }

    /// Creates a client from classifier settings.
    ///
    /// Every request is abandoned after the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is configured or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build HTTP client: {}", e)))?;
        debug!(
            url = %config.base_url(),
            timeout_secs = *config.request_timeout_secs(),
            "Created OpenAI-compatible client"
        );
        Ok(Self {
            client,
            api_key: config.api_key().clone(),
            base_url: config.base_url().clone(),
        })
    }

    /// Returns the endpoint URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ChatCompletion for OpenAICompatibleClient {
    #[instrument(skip(self, request), fields(model = %request.model()))]
    async fn complete(&self, request: &ChatRequest) -> Result<String, ChatCompletionError> {
        debug!(
            message_count = request.messages().len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "HTTP request failed");
                ChatCompletionError::Http(format!("Request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(status = %status, error = %error_text, "API error");
            return Err(ChatCompletionError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse response");
            ChatCompletionError::ResponseParsing(format!("Failed to parse JSON: {}", e))
        })?;

        debug!(choices = chat_response.choices.len(), "Received response");
        chat_response.first_text()
    }
}
