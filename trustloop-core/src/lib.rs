//! # trustloop-core
//!
//! Core traits and types for the reflect-critique-correct loop.
//!
//! ## Overview
//!
//! This crate provides the foundational abstractions shared by every trustloop crate:
//!
//! - [`Candidate`] / [`Verdict`] / [`HistoryEntry`] - What the loop records per iteration
//! - [`LoopOutcome`] - The final text plus the full scored history of a run
//! - [`TrustScorer`] / [`Corrector`] - The two external collaborators the loop drives
//! - [`Llm`] - The model interface used by LLM-backed scorers and correctors
//! - [`TrustError`] / [`Result`] - Unified error handling
//!
//! ## Collaborators
//!
//! ```rust,ignore
//! #[async_trait]
//! pub trait TrustScorer: Send + Sync {
//!     fn name(&self) -> &str;
//!     async fn score(&self, text: &str) -> Result<f64>;
//! }
//!
//! #[async_trait]
//! pub trait Corrector: Send + Sync {
//!     fn name(&self) -> &str;
//!     async fn correct(&self, text: &str) -> Result<String>;
//! }
//! ```
//!
//! A score is a real number in `[0, 1]`. Anything else returned by a scorer is
//! rejected with [`TrustError::InvalidScore`].

pub mod candidate;
pub mod collaborators;
pub mod error;
pub mod model;
pub mod types;

pub use candidate::{Candidate, HistoryEntry, LoopOutcome, Verdict, validate_score};
pub use collaborators::{Corrector, TrustScorer};
pub use error::{Result, TrustError};
pub use model::{
    FinishReason, GenerateContentConfig, Llm, LlmRequest, LlmResponse, LlmResponseStream,
    UsageMetadata, collect_text,
};
pub use types::{Content, Part};
