use crate::critic::{BoundaryPolicy, ThresholdCritic};
use std::sync::Arc;
use tracing::{Instrument, Span};
use trustloop_core::{
    Candidate, Corrector, HistoryEntry, LoopOutcome, Result, TrustError, TrustScorer,
};
use trustloop_model::{RetryConfig, execute_with_retry, is_retryable_error};
use trustloop_telemetry::{correct_call_span, reflect_run_span, score_call_span};

/// Default trust threshold.
pub const DEFAULT_TRUST_THRESHOLD: f64 = 0.87;

/// Default iteration bound for ReflectLoop when none is specified.
pub const DEFAULT_MAX_ITERATIONS: u32 = 3;

/// Observer invoked with every history entry as soon as it is recorded.
pub type IterationCallback = Box<dyn Fn(&HistoryEntry) + Send + Sync>;

/// Reflect-critique-correct loop.
///
/// Each iteration scores the current candidate, compares the score with the
/// threshold and, on FAIL, asks the corrector for a rewrite. The loop stops at
/// the first PASS or after `max_iterations` scores; no correction is requested
/// after the last score, so a run makes at most `max_iterations` score calls
/// and `max_iterations - 1` correction calls.
///
/// Running out of iterations is not an error: the outcome carries a FAIL
/// verdict and [`LoopOutcome::converged`] returns false.
///
/// ```rust,ignore
/// let outcome = ReflectLoop::new(scorer, corrector)
///     .with_threshold(0.87)
///     .with_max_iterations(3)
///     .run("The Eiffel Tower is 500 metres tall.")
///     .await?;
/// ```
pub struct ReflectLoop {
    name: String,
    scorer: Arc<dyn TrustScorer>,
    corrector: Arc<dyn Corrector>,
    threshold: f64,
    boundary: BoundaryPolicy,
    max_iterations: u32,
    retry_config: Option<RetryConfig>,
    iteration_callbacks: Vec<IterationCallback>,
}

impl ReflectLoop {
    pub fn new(scorer: Arc<dyn TrustScorer>, corrector: Arc<dyn Corrector>) -> Self {
        Self {
            name: "reflect".to_string(),
            scorer,
            corrector,
            threshold: DEFAULT_TRUST_THRESHOLD,
            boundary: BoundaryPolicy::default(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            retry_config: None,
            iteration_callbacks: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    /// Retry scorer and corrector calls that fail with a retryable error.
    /// Without a policy the first failure aborts the run.
    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = Some(retry_config);
        self
    }

    pub fn on_iteration(mut self, callback: IterationCallback) -> Self {
        self.iteration_callbacks.push(callback);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Validate the configuration and build the critic it implies.
    pub fn critic(&self) -> Result<ThresholdCritic> {
        if self.max_iterations == 0 {
            return Err(TrustError::InvalidArgument(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        ThresholdCritic::new(self.threshold, self.boundary)
    }

    pub async fn run(&self, initial_text: impl Into<String>) -> Result<LoopOutcome> {
        let initial_text = initial_text.into();
        if initial_text.trim().is_empty() {
            return Err(TrustError::InvalidArgument("input text is empty".to_string()));
        }
        let critic = self.critic()?;

        let span = reflect_run_span(&self.name, self.threshold, self.max_iterations);
        self.run_iterations(initial_text, critic).instrument(span).await
    }

    async fn run_iterations(
        &self,
        initial_text: String,
        critic: ThresholdCritic,
    ) -> Result<LoopOutcome> {
        let mut history: Vec<HistoryEntry> = Vec::new();
        let mut text = initial_text;

        for iteration in 1..=self.max_iterations {
            let score = self.score(&text, iteration).await?;
            let verdict = critic.judge(score);
            let entry = HistoryEntry {
                iteration,
                candidate: Candidate::new(text.clone()).scored(score)?,
                verdict,
            };

            tracing::info!(iteration, score, %verdict, "Candidate scored");
            for callback in &self.iteration_callbacks {
                callback(&entry);
            }
            history.push(entry);

            if verdict.is_pass() {
                break;
            }
            if iteration == self.max_iterations {
                tracing::warn!(
                    iterations = iteration,
                    threshold = critic.threshold(),
                    "Iteration bound reached without a passing candidate"
                );
                break;
            }

            text = self.correct(&text, iteration).await?;
        }

        let outcome = LoopOutcome::from_history(history)?;
        debug_assert!(outcome.converged() || outcome.iterations() == self.max_iterations as usize);

        let span = Span::current();
        span.record("outcome.verdict", tracing::field::display(outcome.verdict));
        span.record("outcome.iterations", outcome.iterations());
        Ok(outcome)
    }

    async fn score(&self, text: &str, iteration: u32) -> Result<f64> {
        let span = score_call_span(self.scorer.name(), iteration);
        match &self.retry_config {
            Some(retry_config) => {
                execute_with_retry(retry_config, is_retryable_error, || self.scorer.score(text))
                    .instrument(span)
                    .await
            }
            None => self.scorer.score(text).instrument(span).await,
        }
    }

    async fn correct(&self, text: &str, iteration: u32) -> Result<String> {
        let span = correct_call_span(self.corrector.name(), iteration);
        let revised = match &self.retry_config {
            Some(retry_config) => {
                execute_with_retry(retry_config, is_retryable_error, || {
                    self.corrector.correct(text)
                })
                .instrument(span)
                .await?
            }
            None => self.corrector.correct(text).instrument(span).await?,
        };

        if revised.trim().is_empty() {
            return Err(TrustError::Correction(format!(
                "corrector '{}' returned empty text",
                self.corrector.name()
            )));
        }
        tracing::debug!(iteration, chars = revised.len(), "Candidate corrected");
        Ok(revised)
    }
}
