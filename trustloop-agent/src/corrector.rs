use async_trait::async_trait;
use std::sync::Arc;
use trustloop_core::{
    Content, Corrector, GenerateContentConfig, Llm, LlmRequest, Result, TrustError, collect_text,
};

/// Default rewrite instruction. `{text}` is replaced with the candidate and
/// `{question}` with the configured question, if any.
pub const DEFAULT_CORRECTION_TEMPLATE: &str = r#"The following text was judged untrustworthy:
it may contain factual errors, invented details or unsupported claims.
{question}
Text:
"{text}"

Rewrite the text so that every claim is factually reliable. Keep the original meaning,
scope and tone where the facts allow it, and remove claims you cannot support.
Return only the rewritten text, with no preamble or commentary."#;

/// Corrector that asks a model to rewrite the candidate.
pub struct LlmCorrector {
    model: Arc<dyn Llm>,
    template: String,
    question: Option<String>,
    temperature: Option<f32>,
}

impl LlmCorrector {
    pub fn new(model: Arc<dyn Llm>) -> Self {
        Self {
            model,
            template: DEFAULT_CORRECTION_TEMPLATE.to_string(),
            question: None,
            temperature: Some(0.2),
        }
    }

    /// Replace the rewrite instruction. Must contain `{text}`.
    pub fn with_template(mut self, template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if !template.contains("{text}") {
            return Err(TrustError::InvalidArgument(
                "correction template must contain a {text} placeholder".to_string(),
            ));
        }
        self.template = template;
        Ok(self)
    }

    /// Question the text answers; gives the model context for the rewrite.
    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = Some(question.into());
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    fn render(&self, text: &str) -> String {
        let question = self
            .question
            .as_ref()
            .map(|q| format!("It answers the question: \"{q}\"\n"))
            .unwrap_or_default();
        fill_placeholders(&self.template, text, &question)
    }
}

#[async_trait]
impl Corrector for LlmCorrector {
    fn name(&self) -> &str {
        self.model.name()
    }

    async fn correct(&self, text: &str) -> Result<String> {
        let mut request = LlmRequest::new(
            self.model.name(),
            vec![Content::new("user").with_text(self.render(text))],
        );
        if self.temperature.is_some() {
            request = request.with_config(GenerateContentConfig {
                temperature: self.temperature,
                ..Default::default()
            });
        }

        let stream = self.model.generate_content(request, false).await?;
        let revised = collect_text(stream).await?;
        let revised = strip_wrapping_quotes(revised.trim());
        if revised.is_empty() {
            return Err(TrustError::Correction("model returned an empty rewrite".to_string()));
        }
        Ok(revised.to_string())
    }
}

/// Models often echo the quoting used in the prompt.
fn strip_wrapping_quotes(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .map(str::trim)
        .unwrap_or(text)
}

/// Substitute `{text}` and `{question}` in one left-to-right pass, so braces
/// inside the substituted values are never expanded.
fn fill_placeholders(template: &str, text: &str, question: &str) -> String {
    let mut out = String::with_capacity(template.len() + text.len() + question.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        if let Some(after) = tail.strip_prefix("{text}") {
            out.push_str(text);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{question}") {
            out.push_str(question);
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}
