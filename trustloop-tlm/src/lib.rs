//! # trustloop-tlm
//!
//! Trustworthiness scorers implementing [`trustloop_core::TrustScorer`].
//!
//! - [`TlmClient`] - Client for the hosted trust-scoring API (`POST {base}/score`)
//! - [`LlmTrustScorer`] - LLM-as-judge fallback scorer
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use trustloop_core::TrustScorer;
//! use trustloop_tlm::{QualityPreset, TlmClient, TlmConfig};
//!
//! let config = TlmConfig::new("tlm-key")
//!     .with_quality_preset(QualityPreset::High)
//!     .with_prompt("What year did the Berlin Wall fall?");
//! let scorer = TlmClient::new(config)?;
//! let score = scorer.score("The Berlin Wall fell in 1989.").await?;
//! ```

pub mod client;
pub mod config;
pub mod judge;

pub use client::TlmClient;
pub use config::{
    QualityPreset, TLM_API_BASE, TLM_API_KEY_VARS, TLM_BASE_URL_VAR, TlmConfig,
};
pub use judge::{JudgeReply, LlmJudgeConfig, LlmTrustScorer};
