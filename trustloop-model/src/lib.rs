//! # trustloop-model
//!
//! LLM clients for trustloop correctors and judge scorers.
//!
//! ## Overview
//!
//! - [`openai::OpenAIClient`] - OpenAI and OpenAI-compatible chat completions (feature `openai`)
//! - [`MockLlm`] - Canned responses for tests
//! - [`RetryConfig`] / [`execute_with_retry`] - Backoff policy shared by every remote call
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use trustloop_model::openai::{OpenAIClient, OpenAIConfig};
//!
//! let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
//! let model = OpenAIClient::new(OpenAIConfig::new(api_key, "gpt-4o-mini"));
//! ```

pub mod mock;
#[cfg(feature = "openai")]
pub mod openai;
pub mod retry;

pub use mock::MockLlm;
pub use retry::{
    RetryConfig, execute_with_retry, is_retryable_error, is_retryable_error_message,
    is_retryable_status_code,
};
