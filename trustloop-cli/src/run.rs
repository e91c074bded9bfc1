use crate::cli::RunArgs;
use crate::config::{Config, ScorerKind};
use anyhow::{Context, Result, bail};
use std::sync::Arc;
use trustloop_agent::{LlmCorrector, LoopOutcome, ReflectLoop};
use trustloop_core::{Llm, TrustScorer};
use trustloop_model::RetryConfig;
use trustloop_model::openai::OpenAIClient;
use trustloop_tlm::{LlmTrustScorer, TlmClient};

/// Exit status when `--require-pass` is set and no candidate passed.
pub const EXIT_NOT_CONVERGED: u8 = 2;

/// Handle `trustloop run`. Returns the process exit status.
pub async fn run(args: RunArgs) -> Result<u8> {
    let config = Config::resolve(&args)?;
    let text = read_input(&args)?;

    let outcome = execute(&config, text).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", render_report(&outcome, config.threshold));
    }
    Ok(exit_status(&outcome, args.require_pass))
}

/// Build the loop described by `config` and run it once on `text`.
pub async fn execute(config: &Config, text: String) -> Result<LoopOutcome> {
    let reflect = build_loop(config)?;
    tracing::info!(
        scorer = ?config.scorer,
        model = %config.openai.model,
        threshold = config.threshold,
        max_iterations = config.max_iterations,
        "Starting trust loop"
    );
    Ok(reflect.run(text).await?)
}

pub fn build_loop(config: &Config) -> Result<ReflectLoop> {
    // Retries happen once, in the loop, and only when configured.
    let client = OpenAIClient::new(config.openai_config()?)?
        .with_retry_config(RetryConfig::disabled());
    let model: Arc<dyn Llm> = Arc::new(client);

    let scorer: Arc<dyn TrustScorer> = match config.scorer {
        ScorerKind::Tlm => Arc::new(TlmClient::new(config.tlm_config()?)?),
        ScorerKind::Llm => {
            let mut judge = LlmTrustScorer::new(model.clone());
            if let Some(question) = &config.question {
                judge = judge.with_question(question);
            }
            Arc::new(judge)
        }
    };

    let mut corrector = LlmCorrector::new(model);
    if let Some(question) = &config.question {
        corrector = corrector.with_question(question);
    }

    let mut reflect = ReflectLoop::new(scorer, Arc::new(corrector))
        .with_threshold(config.threshold)
        .with_boundary(config.boundary)
        .with_max_iterations(config.max_iterations);
    if let Some(retries) = config.retries {
        reflect = reflect.with_retry_config(RetryConfig::default().with_max_retries(retries));
    }
    Ok(reflect)
}

pub fn read_input(args: &RunArgs) -> Result<String> {
    let text = match (&args.text, &args.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => bail!("provide the text with --text or --file"),
    };
    if text.trim().is_empty() {
        bail!("input text is empty");
    }
    Ok(text)
}

pub fn exit_status(outcome: &LoopOutcome, require_pass: bool) -> u8 {
    if require_pass && !outcome.converged() { EXIT_NOT_CONVERGED } else { 0 }
}

/// Human-readable summary: verdict line, per-iteration table, final text.
pub fn render_report(outcome: &LoopOutcome, threshold: f64) -> String {
    let mut out = format!(
        "Verdict: {} after {} iteration(s) (threshold {threshold:.2})\n\n",
        outcome.verdict,
        outcome.iterations()
    );
    out.push_str("  #   score   verdict\n");
    for entry in &outcome.history {
        let score = entry
            .candidate
            .score()
            .map(|score| format!("{score:.4}"))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!("{:>3}  {score:>6}   {}\n", entry.iteration, entry.verdict));
    }
    out.push_str("\nFinal text:\n");
    out.push_str(outcome.final_text.trim_end());
    out.push('\n');
    out
}
