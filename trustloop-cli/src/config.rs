//! Run configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables (a `.env` file is loaded into the environment by the
//! binary), then command-line flags. The merged result is validated once.

use crate::cli::RunArgs;
use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use trustloop_agent::{
    BoundaryPolicy, DEFAULT_MAX_ITERATIONS, DEFAULT_TRUST_THRESHOLD, ThresholdCritic,
};
use trustloop_model::openai::OpenAIConfig;
use trustloop_tlm::{QualityPreset, TLM_API_KEY_VARS, TLM_BASE_URL_VAR, TlmConfig};

pub const THRESHOLD_VAR: &str = "TRUSTLOOP_THRESHOLD";
pub const MAX_ITERATIONS_VAR: &str = "TRUSTLOOP_MAX_ITERATIONS";
pub const MODEL_VAR: &str = "TRUSTLOOP_MODEL";
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const OPENAI_BASE_URL_VAR: &str = "OPENAI_BASE_URL";

const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Which backend produces trust scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScorerKind {
    /// Hosted trust-scoring API.
    #[default]
    Tlm,
    /// Chat model acting as a judge.
    Llm,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub threshold: f64,
    pub max_iterations: u32,
    pub boundary: BoundaryPolicy,
    pub scorer: ScorerKind,
    pub question: Option<String>,
    /// Retry budget for transient failures; `None` disables retries in the loop.
    pub retries: Option<u32>,
    pub tlm: TlmSection,
    pub openai: OpenAISection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_TRUST_THRESHOLD,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            boundary: BoundaryPolicy::default(),
            scorer: ScorerKind::default(),
            question: None,
            retries: None,
            tlm: TlmSection::default(),
            openai: OpenAISection::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TlmSection {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub quality_preset: QualityPreset,
    pub timeout_secs: u64,
}

impl Default for TlmSection {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            quality_preset: QualityPreset::default(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAISection {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: String,
}

impl Default for OpenAISection {
    fn default() -> Self {
        Self { api_key: None, base_url: None, model: DEFAULT_MODEL.to_string() }
    }
}

impl Config {
    /// Read `path` (if any) and apply the process environment on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Full resolution for a `run` invocation, validated.
    pub fn resolve(args: &RunArgs) -> Result<Self> {
        let mut config = Self::load(args.config.as_deref())?;
        config.apply_args(args)?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from environment variables returned by `lookup`.
    /// Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

        if let Some(value) = get(THRESHOLD_VAR) {
            self.threshold = value
                .trim()
                .parse()
                .with_context(|| format!("{THRESHOLD_VAR} is not a number: '{value}'"))?;
        }
        if let Some(value) = get(MAX_ITERATIONS_VAR) {
            self.max_iterations = value
                .trim()
                .parse()
                .with_context(|| format!("{MAX_ITERATIONS_VAR} is not an integer: '{value}'"))?;
        }
        if let Some(key) = TLM_API_KEY_VARS.iter().find_map(|var| get(*var)) {
            self.tlm.api_key = Some(key);
        }
        if let Some(url) = get(TLM_BASE_URL_VAR) {
            self.tlm.base_url = Some(url);
        }
        if let Some(key) = get(OPENAI_API_KEY_VAR) {
            self.openai.api_key = Some(key);
        }
        if let Some(url) = get(OPENAI_BASE_URL_VAR) {
            self.openai.base_url = Some(url);
        }
        if let Some(model) = get(MODEL_VAR) {
            self.openai.model = model;
        }
        Ok(())
    }

    pub fn apply_args(&mut self, args: &RunArgs) -> Result<()> {
        if let Some(threshold) = args.threshold {
            self.threshold = threshold;
        }
        if let Some(max_iterations) = args.max_iterations {
            self.max_iterations = max_iterations;
        }
        if args.strict {
            self.boundary = BoundaryPolicy::Strict;
        }
        if let Some(scorer) = args.scorer {
            self.scorer = scorer;
        }
        if let Some(model) = &args.model {
            self.openai.model = model.clone();
        }
        if let Some(preset) = &args.quality_preset {
            self.tlm.quality_preset = preset.parse()?;
        }
        if let Some(question) = &args.question {
            self.question = Some(question.clone());
        }
        if let Some(retries) = args.retries {
            self.retries = Some(retries);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        ThresholdCritic::new(self.threshold, self.boundary)?;
        if self.max_iterations == 0 {
            bail!("max_iterations must be at least 1");
        }
        if self.openai.api_key.is_none() {
            bail!("{OPENAI_API_KEY_VAR} is required: corrections are produced by a chat model");
        }
        if self.scorer == ScorerKind::Tlm && self.tlm.api_key.is_none() {
            bail!(
                "{} is required for the tlm scorer (or pass --scorer llm)",
                TLM_API_KEY_VARS.join(" or ")
            );
        }
        Ok(())
    }

    pub fn openai_config(&self) -> Result<OpenAIConfig> {
        let api_key = self
            .openai
            .api_key
            .clone()
            .with_context(|| format!("{OPENAI_API_KEY_VAR} not set"))?;
        let mut config = OpenAIConfig::new(api_key, &self.openai.model);
        if let Some(url) = &self.openai.base_url {
            config = config.with_base_url(url);
        }
        Ok(config)
    }

    pub fn tlm_config(&self) -> Result<TlmConfig> {
        let api_key = self
            .tlm
            .api_key
            .clone()
            .with_context(|| format!("{} not set", TLM_API_KEY_VARS.join(" or ")))?;
        let mut config = TlmConfig::new(api_key)
            .with_quality_preset(self.tlm.quality_preset)
            .with_timeout(Duration::from_secs(self.tlm.timeout_secs));
        if let Some(url) = &self.tlm.base_url {
            config = config.with_base_url(url);
        }
        if let Some(question) = &self.question {
            config = config.with_prompt(question);
        }
        Ok(config)
    }
}
