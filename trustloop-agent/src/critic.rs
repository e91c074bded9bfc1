use serde::{Deserialize, Serialize};
use trustloop_core::{Result, TrustError, Verdict};

/// How a score exactly equal to the threshold is classified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// `score >= threshold` passes.
    #[default]
    Inclusive,
    /// `score > threshold` passes.
    Strict,
}

/// Numeric PASS/FAIL decision against a fixed threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdCritic {
    threshold: f64,
    boundary: BoundaryPolicy,
}

impl ThresholdCritic {
    /// The threshold must be finite and within `(0, 1]`.
    pub fn new(threshold: f64, boundary: BoundaryPolicy) -> Result<Self> {
        if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
            return Err(TrustError::InvalidArgument(format!(
                "threshold must be within (0, 1], got {threshold}"
            )));
        }
        Ok(Self { threshold, boundary })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn boundary(&self) -> BoundaryPolicy {
        self.boundary
    }

    pub fn judge(&self, score: f64) -> Verdict {
        let passes = match self.boundary {
            BoundaryPolicy::Inclusive => score >= self.threshold,
            BoundaryPolicy::Strict => score > self.threshold,
        };
        if passes { Verdict::Pass } else { Verdict::Fail }
    }
}
