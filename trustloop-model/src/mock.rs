use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use trustloop_core::{
    Content, Llm, LlmRequest, LlmResponse, LlmResponseStream, Result, TrustError,
};

/// Canned-response model for tests and offline demos.
///
/// Queued turns are consumed one per call; once they run out every call
/// replays the fixed responses. Every request is recorded.
pub struct MockLlm {
    name: String,
    responses: Vec<LlmResponse>,
    turns: Mutex<VecDeque<Result<String>>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            responses: vec![],
            turns: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(mut self, response: LlmResponse) -> Self {
        self.responses.push(response);
        self
    }

    /// Queue a single-call text reply.
    pub fn with_turn(self, text: impl Into<String>) -> Self {
        self.push_turn(Ok(text.into()));
        self
    }

    /// Queue a single-call failure.
    pub fn with_failing_turn(self, error: TrustError) -> Self {
        self.push_turn(Err(error));
        self
    }

    fn push_turn(&self, turn: Result<String>) {
        if let Ok(mut turns) = self.turns.lock() {
            turns.push_back(turn);
        }
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().map(|requests| requests.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|requests| requests.len()).unwrap_or_default()
    }
}

#[async_trait]
impl Llm for MockLlm {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate_content(&self, req: LlmRequest, _stream: bool) -> Result<LlmResponseStream> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(req);
        }

        let next_turn = self.turns.lock().ok().and_then(|mut turns| turns.pop_front());
        let responses = match next_turn {
            Some(Ok(text)) => vec![LlmResponse::new(Content::new("model").with_text(text))],
            Some(Err(error)) => return Err(error),
            None => self.responses.clone(),
        };

        let stream = async_stream::stream! {
            for response in responses {
                yield Ok(response);
            }
        };
        Ok(Box::pin(stream))
    }
}
