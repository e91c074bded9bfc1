//! HTTP client for the hosted trust-scoring API.

use crate::config::TlmConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::Instrument;
use trustloop_core::{Result, TrustError, TrustScorer, validate_score};
use trustloop_model::{
    RetryConfig, execute_with_retry, is_retryable_error, is_retryable_status_code,
};

#[derive(Debug, Serialize)]
struct ScoreRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt: Option<&'a str>,
    response: &'a str,
    quality_preset: String,
}

#[derive(Debug, Deserialize)]
struct ScoreResponse {
    trustworthiness_score: f64,
    #[serde(default)]
    explanation: Option<String>,
}

/// Scores text against the hosted trust-scoring service.
///
/// The client does not retry by default: scoring failures propagate to the
/// caller unless a retry policy is set with [`TlmClient::with_retry_config`].
///
/// # Example
///
/// ```rust,ignore
/// use trustloop_tlm::{TlmClient, TlmConfig};
///
/// let config = TlmConfig::new("tlm-key").with_prompt("Where is the Eiffel Tower?");
/// let scorer = TlmClient::new(config)?;
/// let score = scorer.score("The Eiffel Tower is in Paris.").await?;
/// ```
pub struct TlmClient {
    client: Client,
    config: TlmConfig,
    retry_config: RetryConfig,
}

impl TlmClient {
    pub fn new(config: TlmConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(TrustError::Config("trust-scoring API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TrustError::Service(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config, retry_config: RetryConfig::disabled() })
    }

    #[must_use]
    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    fn api_url(&self) -> String {
        format!("{}/score", self.config.effective_base_url().trim_end_matches('/'))
    }

    async fn request_score(&self, text: &str) -> Result<ScoreResponse> {
        let body = ScoreRequest {
            prompt: self.config.prompt.as_deref(),
            response: text,
            quality_preset: self.config.quality_preset.to_string(),
        };

        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TrustError::Service(format!("Trust-scoring request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            let retryability = if is_retryable_status_code(status.as_u16()) {
                "retryable"
            } else {
                "non-retryable"
            };
            return Err(TrustError::Service(format!(
                "Trust-scoring API error ({}, {}): {}",
                status, retryability, error_text
            )));
        }

        response
            .json::<ScoreResponse>()
            .await
            .map_err(|e| {
                TrustError::Service(format!(
                    "Invalid trust-scoring response (non-retryable): {}",
                    e
                ))
            })
    }
}

#[async_trait]
impl TrustScorer for TlmClient {
    fn name(&self) -> &str {
        "tlm"
    }

    async fn score(&self, text: &str) -> Result<f64> {
        let span = tracing::debug_span!(
            "tlm.score",
            quality_preset = %self.config.quality_preset,
            text_len = text.len()
        );

        let response = execute_with_retry(&self.retry_config, is_retryable_error, || {
            self.request_score(text)
        })
        .instrument(span)
        .await?;

        if let Some(explanation) = &response.explanation {
            tracing::debug!(
                score = response.trustworthiness_score,
                %explanation,
                "Trust score explanation"
            );
        }
        validate_score(response.trustworthiness_score)
    }
}
