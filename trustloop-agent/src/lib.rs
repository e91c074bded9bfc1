//! # trustloop-agent
//!
//! The reflect-critique-correct loop and the collaborators it ships with.
//!
//! - [`ReflectLoop`] - Score, judge, correct; repeat until PASS or the iteration bound
//! - [`ThresholdCritic`] / [`BoundaryPolicy`] - Numeric PASS/FAIL decision
//! - [`LlmCorrector`] - Rewrites untrustworthy text with a model
//! - [`FnScorer`] / [`FnCorrector`] - Plug in any async closure
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use trustloop_agent::{FnCorrector, FnScorer, ReflectLoop};
//!
//! # async fn demo() -> trustloop_core::Result<()> {
//! let scorer = FnScorer::new("demo", |text| async move {
//!     Ok(if text.contains("330") { 0.93 } else { 0.41 })
//! });
//! let corrector = FnCorrector::new("demo", |_text| async move {
//!     Ok("The Eiffel Tower is about 330 metres tall.".to_string())
//! });
//!
//! let outcome = ReflectLoop::new(Arc::new(scorer), Arc::new(corrector))
//!     .with_threshold(0.87)
//!     .with_max_iterations(3)
//!     .run("The Eiffel Tower is 500 metres tall.")
//!     .await?;
//! assert!(outcome.converged());
//! # Ok(())
//! # }
//! ```

mod adapters;
mod corrector;
mod critic;
mod reflect_loop;

pub use adapters::{FnCorrector, FnScorer};
pub use corrector::{DEFAULT_CORRECTION_TEMPLATE, LlmCorrector};
pub use critic::{BoundaryPolicy, ThresholdCritic};
pub use reflect_loop::{
    DEFAULT_MAX_ITERATIONS, DEFAULT_TRUST_THRESHOLD, IterationCallback, ReflectLoop,
};
pub use trustloop_core::{Candidate, HistoryEntry, LoopOutcome, Verdict};
