//! Candidate texts, verdicts and the per-run history.

use crate::{Result, TrustError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Check that a score is a finite number in `[0, 1]`.
pub fn validate_score(score: f64) -> Result<f64> {
    if !score.is_finite() || !(0.0..=1.0).contains(&score) {
        return Err(TrustError::InvalidScore(format!(
            "trustworthiness score must be within [0, 1], got {score}"
        )));
    }
    Ok(score)
}

/// A text under evaluation, plus its trustworthiness score once it has one.
///
/// A candidate can be scored exactly once: [`Candidate::scored`] consumes the
/// unscored value and there is no way to change the score afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CandidateRecord")]
pub struct Candidate {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f64>,
}

/// Wire form of [`Candidate`]; scores are validated on the way in.
#[derive(Deserialize)]
struct CandidateRecord {
    text: String,
    #[serde(default)]
    score: Option<f64>,
}

impl TryFrom<CandidateRecord> for Candidate {
    type Error = TrustError;

    fn try_from(record: CandidateRecord) -> Result<Self> {
        let candidate = Candidate::new(record.text);
        match record.score {
            Some(score) => candidate.scored(score),
            None => Ok(candidate),
        }
    }
}

impl Candidate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), score: None }
    }

    /// Attach a score, validating it lies in `[0, 1]`.
    pub fn scored(self, score: f64) -> Result<Self> {
        if let Some(existing) = self.score {
            return Err(TrustError::InvalidArgument(format!(
                "candidate already scored ({existing})"
            )));
        }
        let score = validate_score(score)?;
        Ok(Self { text: self.text, score: Some(score) })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn score(&self) -> Option<f64> {
        self.score
    }

    pub fn is_scored(&self) -> bool {
        self.score.is_some()
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// Outcome of comparing a score against the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn is_pass(self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => f.write_str("PASS"),
            Verdict::Fail => f.write_str("FAIL"),
        }
    }
}

/// One scored iteration of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// 1-based iteration number.
    pub iteration: u32,
    pub candidate: Candidate,
    pub verdict: Verdict,
}

/// Result of a single loop invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopOutcome {
    pub final_text: String,
    pub verdict: Verdict,
    pub history: Vec<HistoryEntry>,
}

impl LoopOutcome {
    /// Build an outcome from a non-empty history. The final text and verdict are
    /// taken from the last entry.
    pub fn from_history(history: Vec<HistoryEntry>) -> Result<Self> {
        let last = history.last().ok_or_else(|| {
            TrustError::InvalidArgument("a loop outcome needs at least one iteration".to_string())
        })?;
        Ok(Self {
            final_text: last.candidate.text().to_string(),
            verdict: last.verdict,
            history,
        })
    }

    /// Number of iterations (score evaluations) performed.
    pub fn iterations(&self) -> usize {
        self.history.len()
    }

    /// Whether the final candidate passed the threshold.
    pub fn converged(&self) -> bool {
        self.verdict.is_pass()
    }

    /// Number of corrections that fed the history; every entry after the first
    /// was produced by one.
    pub fn corrections(&self) -> usize {
        self.history.len().saturating_sub(1)
    }

    pub fn final_score(&self) -> Option<f64> {
        self.history.last().and_then(|entry| entry.candidate.score())
    }

    pub fn scores(&self) -> Vec<f64> {
        self.history.iter().filter_map(|entry| entry.candidate.score()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(iteration: u32, text: &str, score: f64, verdict: Verdict) -> HistoryEntry {
        HistoryEntry {
            iteration,
            candidate: Candidate::new(text).scored(score).unwrap(),
            verdict,
        }
    }

    #[test]
    fn test_candidate_scoring_is_once_only() {
        let candidate = Candidate::new("Paris is the capital of France.");
        assert!(!candidate.is_scored());

        let scored = candidate.scored(0.91).unwrap();
        assert_eq!(scored.score(), Some(0.91));

        let err = scored.scored(0.5).unwrap_err();
        assert!(matches!(err, TrustError::InvalidArgument(_)));
    }

    #[test]
    fn test_candidate_rejects_out_of_range_scores() {
        for bad in [-0.01, 1.01, f64::NAN, f64::INFINITY] {
            let err = Candidate::new("x").scored(bad).unwrap_err();
            assert!(matches!(err, TrustError::InvalidScore(_)), "accepted {bad}");
        }
        assert!(Candidate::new("x").scored(0.0).is_ok());
        assert!(Candidate::new("x").scored(1.0).is_ok());
    }

    #[test]
    fn test_verdict_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Verdict::Pass).unwrap(), "\"PASS\"");
        assert_eq!(Verdict::Fail.to_string(), "FAIL");
    }

    #[test]
    fn test_outcome_from_history() {
        let outcome = LoopOutcome::from_history(vec![
            entry(1, "draft", 0.86, Verdict::Fail),
            entry(2, "revised", 0.91, Verdict::Pass),
        ])
        .unwrap();

        assert_eq!(outcome.final_text, "revised");
        assert!(outcome.converged());
        assert_eq!(outcome.iterations(), 2);
        assert_eq!(outcome.corrections(), 1);
        assert_eq!(outcome.final_score(), Some(0.91));
        assert_eq!(outcome.scores(), vec![0.86, 0.91]);
    }

    #[test]
    fn test_outcome_requires_history() {
        assert!(LoopOutcome::from_history(Vec::new()).is_err());
    }

    #[test]
    fn test_deserialized_scores_are_validated() {
        let err = serde_json::from_str::<Candidate>(r#"{"text":"x","score":7.0}"#).unwrap_err();
        assert!(err.to_string().contains("within [0, 1]"), "{err}");

        let candidate: Candidate =
            serde_json::from_str(r#"{"text":"revised","score":0.91}"#).unwrap();
        assert_eq!(candidate.text(), "revised");
        assert_eq!(candidate.score(), Some(0.91));

        let entry = serde_json::json!({
            "iteration": 1,
            "candidate": { "text": "draft", "score": -0.5 },
            "verdict": "FAIL"
        });
        assert!(serde_json::from_value::<HistoryEntry>(entry).is_err());
    }

    #[test]
    fn test_unscored_candidate_omits_score_field() {
        let json = serde_json::to_value(Candidate::new("draft")).unwrap();
        assert_eq!(json, serde_json::json!({ "text": "draft" }));
    }
}
