//! Span helpers for trustloop operations
//!
//! Pre-configured spans for instrumenting loop runs and the external calls they make.

use tracing::Span;

/// Create a span covering one reflect-critique-correct run.
///
/// `outcome.verdict` and `outcome.iterations` are declared empty and recorded
/// when the run finishes.
///
/// # Example
/// ```
/// use trustloop_telemetry::reflect_run_span;
/// let span = reflect_run_span("reflect", 0.87, 3);
/// let _enter = span.enter();
/// ```
pub fn reflect_run_span(loop_name: &str, threshold: f64, max_iterations: u32) -> Span {
    tracing::info_span!(
        "reflect.run",
        reflect.name = loop_name,
        reflect.threshold = threshold,
        reflect.max_iterations = max_iterations,
        outcome.verdict = tracing::field::Empty,
        outcome.iterations = tracing::field::Empty,
        otel.kind = "internal"
    )
}

/// Create a span for a trustworthiness scoring call.
pub fn score_call_span(scorer_name: &str, iteration: u32) -> Span {
    tracing::info_span!(
        "trust.score",
        scorer.name = scorer_name,
        iteration = iteration,
        otel.kind = "client"
    )
}

/// Create a span for a correction call.
pub fn correct_call_span(corrector_name: &str, iteration: u32) -> Span {
    tracing::info_span!(
        "trust.correct",
        corrector.name = corrector_name,
        iteration = iteration,
        otel.kind = "client"
    )
}

/// Create a span for model API calls
///
/// # Example
/// ```
/// use trustloop_telemetry::model_call_span;
/// let span = model_call_span("gpt-4o-mini");
/// let _enter = span.enter();
/// ```
pub fn model_call_span(model_name: &str) -> Span {
    tracing::info_span!("model.call", model.name = model_name, otel.kind = "client")
}
