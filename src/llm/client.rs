//! Core client trait and test double for text generation

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Result, ScenegenError};
use crate::llm::types::{GenerationRequest, GenerationResponse};

/// Stateless text-generation client - each call is independent (fresh context)
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Single generation request (blocking until complete)
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse>;

    /// Model identifier used when a request does not override it
    fn model(&self) -> &str;

    /// Whether the client holds a usable credential
    fn is_ready(&self) -> bool;
}

/// Scripted generator for tests
///
/// Pops queued replies in order and records every request it receives, so
/// tests can assert on call counts and payloads.
pub struct MockGenerator {
    replies: Mutex<VecDeque<Result<GenerationResponse>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockGenerator {
    /// Create a mock with no scripted replies
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful reply with the given text
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(Ok(GenerationResponse {
            text: text.into(),
            ..Default::default()
        }));
        self
    }

    /// Queue a full response
    pub fn with_response(self, response: GenerationResponse) -> Self {
        self.replies.lock().unwrap().push_back(Ok(response));
        self
    }

    /// Queue an error reply
    pub fn with_error(self, error: ScenegenError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    /// All requests received so far, in call order
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of calls made against this mock
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ScenegenError::InvalidState(
                    "mock generator has no scripted reply".to_string(),
                ))
            })
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    fn is_ready(&self) -> bool {
        true
    }
}
