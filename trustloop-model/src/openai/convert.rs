//! Wire types for the chat completions endpoint and conversion to core types.

use serde::{Deserialize, Serialize};
use trustloop_core::{Content, FinishReason, LlmRequest, LlmResponse, UsageMetadata};

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub stream: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Choice {
    pub message: ChatMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Usage {
    pub prompt_tokens: i32,
    pub completion_tokens: i32,
    pub total_tokens: i32,
}

/// Core roles use "model" for assistant turns.
pub(crate) fn content_to_message(content: &Content) -> ChatMessage {
    let role = match content.role.as_str() {
        "model" | "assistant" => "assistant",
        "system" => "system",
        _ => "user",
    };
    ChatMessage { role: role.to_string(), content: Some(content.text()) }
}

pub(crate) fn build_request(
    request: &LlmRequest,
    model: &str,
    default_max_tokens: Option<u32>,
) -> ChatCompletionRequest {
    let config = request.config.as_ref();
    ChatCompletionRequest {
        model: model.to_string(),
        messages: request.contents.iter().map(content_to_message).collect(),
        temperature: config.and_then(|c| c.temperature),
        top_p: config.and_then(|c| c.top_p),
        max_tokens: config
            .and_then(|c| c.max_output_tokens)
            .and_then(|t| u32::try_from(t).ok())
            .or(default_max_tokens),
        stream: false,
    }
}

fn convert_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "stop" | "tool_calls" => FinishReason::Stop,
        "length" => FinishReason::MaxTokens,
        "content_filter" => FinishReason::Safety,
        _ => FinishReason::Other,
    }
}

pub(crate) fn from_response(response: ChatCompletionResponse) -> LlmResponse {
    let usage_metadata = response.usage.map(|usage| UsageMetadata {
        prompt_token_count: usage.prompt_tokens,
        candidates_token_count: usage.completion_tokens,
        total_token_count: usage.total_tokens,
    });

    let Some(choice) = response.choices.into_iter().next() else {
        return LlmResponse {
            usage_metadata,
            turn_complete: true,
            error_code: Some("empty_choices".to_string()),
            error_message: Some("response contained no choices".to_string()),
            ..Default::default()
        };
    };

    let finish_reason = choice.finish_reason.as_deref().map(convert_finish_reason);
    let mut content = Content::new("model");
    if let Some(text) = choice.message.content {
        content = content.with_text(text);
    }

    LlmResponse {
        content: Some(content),
        usage_metadata,
        finish_reason,
        partial: false,
        turn_complete: true,
        error_code: None,
        error_message: None,
    }
}
