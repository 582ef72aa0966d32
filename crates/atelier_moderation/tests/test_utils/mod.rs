//! Test utilities for moderation tests.
//!
//! Provides a local HTTP stub server and a scripted chat completion backend
//! that records every request.

pub mod http_stub;

use async_trait::async_trait;
use atelier_moderation::ChatCompletionError;
use atelier_moderation::openai_compat::{ChatCompletion, ChatRequest};
use std::sync::{Arc, Mutex};

/// How the mock answers.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Reply with this text
    Reply(String),
    /// Fail with this error
    Fail(ChatCompletionError),
}

/// Chat completion backend returning a fixed answer.
#[derive(Debug, Clone)]
pub struct MockChatClient {
    behavior: MockBehavior,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockChatClient {
    /// Mock replying with `text`.
    pub fn replying(text: &str) -> Self {
        Self {
            behavior: MockBehavior::Reply(text.to_string()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Mock failing with `error`.
    pub fn failing(error: ChatCompletionError) -> Self {
        Self {
            behavior: MockBehavior::Fail(error),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatCompletion for MockChatClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, ChatCompletionError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.behavior {
            MockBehavior::Reply(text) => Ok(text.clone()),
            MockBehavior::Fail(error) => Err(error.clone()),
        }
    }
}
