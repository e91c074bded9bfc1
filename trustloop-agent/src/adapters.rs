//! Closure-backed collaborators.

use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;
use trustloop_core::{Corrector, Result, TrustScorer};

type ScoreHandler =
    Box<dyn Fn(String) -> Pin<Box<dyn Future<Output = Result<f64>> + Send>> + Send + Sync>;

type CorrectHandler =
    Box<dyn Fn(String) -> Pin<Box<dyn Future<Output = Result<String>> + Send>> + Send + Sync>;

/// A [`TrustScorer`] backed by an async closure.
///
/// ```rust
/// use trustloop_agent::FnScorer;
///
/// let scorer = FnScorer::new("length", |text| async move {
///     Ok(if text.len() > 10 { 0.9 } else { 0.2 })
/// });
/// ```
pub struct FnScorer {
    name: String,
    handler: ScoreHandler,
}

impl FnScorer {
    pub fn new<F, Fut>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<f64>> + Send + 'static,
    {
        Self { name: name.into(), handler: Box::new(move |text| Box::pin(handler(text))) }
    }
}

#[async_trait]
impl TrustScorer for FnScorer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn score(&self, text: &str) -> Result<f64> {
        (self.handler)(text.to_string()).await
    }
}

/// A [`Corrector`] backed by an async closure.
pub struct FnCorrector {
    name: String,
    handler: CorrectHandler,
}

impl FnCorrector {
    pub fn new<F, Fut>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String>> + Send + 'static,
    {
        Self { name: name.into(), handler: Box::new(move |text| Box::pin(handler(text))) }
    }

    /// Returns its input unchanged.
    pub fn identity() -> Self {
        Self::new("identity", |text| async move { Ok(text) })
    }
}

#[async_trait]
impl Corrector for FnCorrector {
    fn name(&self) -> &str {
        &self.name
    }

    async fn correct(&self, text: &str) -> Result<String> {
        (self.handler)(text.to_string()).await
    }
}
