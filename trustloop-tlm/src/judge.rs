//! LLM-as-judge trustworthiness scoring
//!
//! Asks a model to rate how factually reliable a text is. Useful when the
//! hosted scoring service is unavailable; far less calibrated than it.

use async_trait::async_trait;
use std::sync::Arc;
use trustloop_core::{
    Content, GenerateContentConfig, Llm, LlmRequest, Result, TrustError, TrustScorer,
    collect_text, validate_score,
};

const JUDGE_SYSTEM_PREAMBLE: &str = "You are a fact-checking judge. Be objective and consistent. \
                                     Always respond in the exact format requested.";

/// Configuration for the LLM judge
#[derive(Debug, Clone)]
pub struct LlmJudgeConfig {
    /// Maximum tokens for judge response
    pub max_tokens: i32,
    /// Temperature for judge (low for consistency)
    pub temperature: f32,
}

impl Default for LlmJudgeConfig {
    fn default() -> Self {
        Self { max_tokens: 256, temperature: 0.0 }
    }
}

/// Verdict text returned by the judge, parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct JudgeReply {
    pub score: f64,
    pub reasoning: String,
}

/// Trustworthiness scorer backed by an LLM judge.
pub struct LlmTrustScorer {
    model: Arc<dyn Llm>,
    config: LlmJudgeConfig,
    question: Option<String>,
}

impl LlmTrustScorer {
    pub fn new(model: Arc<dyn Llm>) -> Self {
        Self { model, config: LlmJudgeConfig::default(), question: None }
    }

    pub fn with_config(mut self, config: LlmJudgeConfig) -> Self {
        self.config = config;
        self
    }

    /// Question the scored text is meant to answer.
    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = Some(question.into());
        self
    }

    fn prompt(&self, text: &str) -> String {
        let mut prompt = format!("{JUDGE_SYSTEM_PREAMBLE}\n\n");
        if let Some(question) = &self.question {
            prompt.push_str(&format!("Question:\n\"{}\"\n\n", question));
        }
        prompt.push_str(&format!(
            r#"Text to evaluate:
"{}"

Estimate how likely it is that every factual claim in the text is correct.
Penalize invented facts, names, dates or statistics, and unsupported certainty.

Respond in this exact format:
SCORE: [0.0-1.0] (1.0 = completely trustworthy)
REASONING: [Brief explanation of the score]"#,
            text
        ));
        prompt
    }

    /// Parse a judge reply. A missing or unparseable `SCORE:` line is an error.
    pub fn parse_reply(response: &str) -> Result<JudgeReply> {
        let mut score = None;
        let mut reasoning = String::new();

        for line in response.lines() {
            let line = line.trim();
            if let Some(s) = line.strip_prefix("SCORE:") {
                let s = s.trim().trim_start_matches('[');
                let s = s.split(|c: char| c == ']' || c.is_whitespace()).next().unwrap_or("");
                score = s.parse::<f64>().ok();
            } else if let Some(r) = line.strip_prefix("REASONING:") {
                reasoning = r.trim().to_string();
            }
        }

        let score = score.ok_or_else(|| {
            TrustError::Service(format!(
                "judge reply had no parseable SCORE line (non-retryable): {response:?}"
            ))
        })?;
        Ok(JudgeReply { score: validate_score(score)?, reasoning })
    }
}

#[async_trait]
impl TrustScorer for LlmTrustScorer {
    fn name(&self) -> &str {
        self.model.name()
    }

    async fn score(&self, text: &str) -> Result<f64> {
        let request = LlmRequest::new(
            self.model.name(),
            vec![Content::new("user").with_text(self.prompt(text))],
        )
        .with_config(GenerateContentConfig {
            temperature: Some(self.config.temperature),
            top_p: None,
            max_output_tokens: Some(self.config.max_tokens),
        });

        let stream = self.model.generate_content(request, false).await?;
        let reply = collect_text(stream).await?;
        if reply.trim().is_empty() {
            return Err(TrustError::Service("Empty response from judge".to_string()));
        }

        let parsed = Self::parse_reply(&reply)?;
        tracing::debug!(score = parsed.score, reasoning = %parsed.reasoning, "Judge scored text");
        Ok(parsed.score)
    }
}
