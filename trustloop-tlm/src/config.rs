//! Configuration for the hosted trust-scoring API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use trustloop_core::{Result, TrustError};

/// Default base URL of the hosted trust-scoring API.
pub const TLM_API_BASE: &str = "https://api.cleanlab.ai/api/v1/tlm";

/// Environment variables consulted for the API key, in order.
pub const TLM_API_KEY_VARS: &[&str] = &["TLM_API_KEY", "CLEANLAB_TLM_API_KEY"];

/// Environment variable overriding the base URL.
pub const TLM_BASE_URL_VAR: &str = "TLM_BASE_URL";

/// Scoring quality/latency trade-off understood by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Base,
    Low,
    #[default]
    Medium,
    High,
    Best,
}

impl fmt::Display for QualityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QualityPreset::Base => "base",
            QualityPreset::Low => "low",
            QualityPreset::Medium => "medium",
            QualityPreset::High => "high",
            QualityPreset::Best => "best",
        };
        f.write_str(name)
    }
}

impl FromStr for QualityPreset {
    type Err = TrustError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base" => Ok(QualityPreset::Base),
            "low" => Ok(QualityPreset::Low),
            "medium" => Ok(QualityPreset::Medium),
            "high" => Ok(QualityPreset::High),
            "best" => Ok(QualityPreset::Best),
            other => Err(TrustError::Config(format!("unknown quality preset '{other}'"))),
        }
    }
}

/// Configuration for [`crate::TlmClient`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TlmConfig {
    /// API key sent as a bearer token.
    #[serde(default, skip_serializing)]
    pub api_key: String,
    /// Optional custom base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default)]
    pub quality_preset: QualityPreset,
    /// Question or instruction the scored text answers. Scoring a response
    /// without its prompt is allowed but less informative.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Per-request timeout.
    #[serde(default = "default_timeout", with = "duration_secs")]
    pub timeout: Duration,
}

fn default_timeout() -> Duration {
    Duration::from_secs(60)
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(deserializer)?))
    }
}

impl Default for TlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: None,
            quality_preset: QualityPreset::default(),
            prompt: None,
            timeout: default_timeout(),
        }
    }
}

impl TlmConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), ..Default::default() }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_quality_preset(mut self, preset: QualityPreset) -> Self {
        self.quality_preset = preset;
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn effective_base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(TLM_API_BASE)
    }
}
