use crate::Result;
use async_trait::async_trait;

/// Produces a trustworthiness score in `[0, 1]` for a piece of text.
///
/// Implementations are usually backed by a remote service; transport, auth and
/// rate-limit failures should be reported as [`crate::TrustError::Service`].
#[async_trait]
pub trait TrustScorer: Send + Sync {
    fn name(&self) -> &str;
    async fn score(&self, text: &str) -> Result<f64>;
}

/// Rewrites a potentially untrustworthy text into a new candidate.
#[async_trait]
pub trait Corrector: Send + Sync {
    fn name(&self) -> &str;
    async fn correct(&self, text: &str) -> Result<String>;
}
