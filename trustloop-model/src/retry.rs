use std::{future::Future, time::Duration};
use trustloop_core::{Result, TrustError};

/// Exponential backoff policy for calls to remote collaborators.
#[derive(Clone, Debug)]
pub struct RetryConfig {
    pub enabled: bool,
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_retries: 3,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    #[must_use]
    pub fn disabled() -> Self {
        Self { enabled: false, ..Self::default() }
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    #[must_use]
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    #[must_use]
    pub fn with_backoff_multiplier(mut self, backoff_multiplier: f32) -> Self {
        self.backoff_multiplier = backoff_multiplier;
        self
    }
}

/// HTTP statuses worth another attempt: timeouts, throttling and upstream failures.
#[must_use]
pub fn is_retryable_status_code(status_code: u16) -> bool {
    matches!(status_code, 408 | 429 | 500 | 502 | 503 | 504)
}

/// Phrases (uppercase) that mark a transport failure as transient.
const TRANSIENT_PHRASES: &[&str] = &[
    "RATE LIMIT",
    "TOO MANY REQUESTS",
    "UNAVAILABLE",
    "TIMEOUT",
    "TIMED OUT",
    "CONNECTION RESET",
];

/// Status codes written as `(NNN ...` or `HTTP NNN`. Bare numbers elsewhere in a
/// message (ports, byte counts, column positions) are not statuses.
fn status_codes(message: &str) -> impl Iterator<Item = u16> + '_ {
    let after_paren = message.split('(').skip(1);
    let after_http = message.split("HTTP ").skip(1);
    after_paren.chain(after_http).filter_map(|rest| {
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 3 { rest[..3].parse().ok() } else { None }
    })
}

/// Classify an error message. The `retryable`/`non-retryable` markers written by
/// the HTTP clients in this workspace decide first; otherwise a status code in
/// status position or a transport phrase marks the error as transient.
#[must_use]
pub fn is_retryable_error_message(message: &str) -> bool {
    let normalized = message.to_ascii_uppercase();
    if normalized.contains("NON-RETRYABLE") {
        return false;
    }
    if normalized.contains("RETRYABLE") {
        return true;
    }
    status_codes(&normalized).any(is_retryable_status_code)
        || TRANSIENT_PHRASES.iter().any(|phrase| normalized.contains(phrase))
}

/// Only remote failures (scoring service or model) are ever retried.
#[must_use]
pub fn is_retryable_error(error: &TrustError) -> bool {
    match error {
        TrustError::Service(message) | TrustError::Model(message) => {
            is_retryable_error_message(message)
        }
        _ => false,
    }
}

impl RetryConfig {
    /// Delay to wait after a failed attempt that waited `current`.
    fn backoff_after(&self, current: Duration) -> Duration {
        if current >= self.max_delay {
            return self.max_delay;
        }
        let factor = f64::from(self.backoff_multiplier.max(1.0));
        Duration::from_secs_f64(current.as_secs_f64() * factor).min(self.max_delay)
    }
}

/// Run `operation` until it succeeds, fails with an error `classify_error`
/// rejects, or the retry budget is spent. The last error is returned as is.
pub async fn execute_with_retry<T, Op, Fut, Classify>(
    retry_config: &RetryConfig,
    classify_error: Classify,
    mut operation: Op,
) -> Result<T>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    Classify: Fn(&TrustError) -> bool,
{
    if !retry_config.enabled {
        return operation().await;
    }

    let mut delay = retry_config.initial_delay;
    for attempt in 1..=retry_config.max_retries {
        match operation().await {
            Err(error) if classify_error(&error) => {
                trustloop_telemetry::warn!(
                    attempt,
                    max_retries = retry_config.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "Transient failure from remote collaborator; retrying"
                );
                tokio::time::sleep(delay).await;
                delay = retry_config.backoff_after(delay);
            }
            other => return other,
        }
    }
    operation().await
}
