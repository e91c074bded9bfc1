//! OpenAI-compatible client implementation.

use super::config::OpenAIConfig;
use super::convert::{self, ChatCompletionResponse};
use crate::retry::{
    RetryConfig, execute_with_retry, is_retryable_error, is_retryable_status_code,
};
use async_stream::try_stream;
use async_trait::async_trait;
use reqwest::Client;
use tracing::Instrument;
use trustloop_core::{Llm, LlmRequest, LlmResponseStream, TrustError};

/// Client for OpenAI and OpenAI-compatible chat completions APIs.
///
/// Requests are always sent non-streaming; the response is surfaced as a
/// single-item stream.
///
/// # Example
///
/// ```rust,ignore
/// use trustloop_model::openai::{OpenAIClient, OpenAIConfig};
///
/// let client = OpenAIClient::new(OpenAIConfig::new(
///     std::env::var("OPENAI_API_KEY")?,
///     "gpt-4o-mini",
/// ))?;
/// ```
pub struct OpenAIClient {
    client: Client,
    config: OpenAIConfig,
    retry_config: RetryConfig,
}

impl OpenAIClient {
    /// Create a new client.
    pub fn new(config: OpenAIConfig) -> Result<Self, TrustError> {
        let client = Client::builder()
            .build()
            .map_err(|e| TrustError::Model(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config, retry_config: RetryConfig::default() })
    }

    /// Replace the per-request retry policy. Callers that retry at a higher
    /// level should pass [`RetryConfig::disabled`].
    #[must_use]
    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    fn api_url(&self) -> String {
        format!("{}/chat/completions", self.config.effective_base_url().trim_end_matches('/'))
    }
}

#[async_trait]
impl Llm for OpenAIClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn generate_content(
        &self,
        request: LlmRequest,
        _stream: bool,
    ) -> Result<LlmResponseStream, TrustError> {
        let api_url = self.api_url();
        let api_key = self.config.api_key.clone();
        let organization_id = self.config.organization_id.clone();
        let chat_request =
            convert::build_request(&request, &self.config.model, self.config.max_tokens);
        let client = self.client.clone();
        let retry_config = self.retry_config.clone();
        let span = trustloop_telemetry::model_call_span(&self.config.model);

        let response_stream = try_stream! {
            let response = execute_with_retry(&retry_config, is_retryable_error, || {
                let client = client.clone();
                let api_url = api_url.clone();
                let api_key = api_key.clone();
                let organization_id = organization_id.clone();
                let chat_request = chat_request.clone();
                async move {
                    let mut builder = client
                        .post(&api_url)
                        .bearer_auth(&api_key)
                        .json(&chat_request);
                    if let Some(org_id) = &organization_id {
                        builder = builder.header("OpenAI-Organization", org_id);
                    }

                    let response = builder
                        .send()
                        .await
                        .map_err(|e| TrustError::Model(format!("Chat API request failed: {}", e)))?;

                    if !response.status().is_success() {
                        let status = response.status();
                        let error_text = response.text().await.unwrap_or_default();
                        let retryability = if is_retryable_status_code(status.as_u16()) {
                            "retryable"
                        } else {
                            "non-retryable"
                        };
                        return Err(TrustError::Model(format!(
                            "Chat API error ({}, {}): {}",
                            status, retryability, error_text
                        )));
                    }

                    response
                        .json::<ChatCompletionResponse>()
                        .await
                        .map_err(|e| {
                            TrustError::Model(format!(
                                "Invalid chat API response (non-retryable): {}",
                                e
                            ))
                        })
                }
            })
            .instrument(span)
            .await?;

            yield convert::from_response(response);
        };

        Ok(Box::pin(response_stream))
    }
}
