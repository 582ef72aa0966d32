//! Test utilities for workflow tests.
//!
//! Scripted stand-ins for the chat-completion service and the job queue,
//! both counting how often they are called.

use async_trait::async_trait;
use atelier::{ChatCompletion, GenerationError, GenerationErrorKind, JobStatus, JobTransport};
use atelier_generation::{JobRequest, StatusResponse, SubmitResponse};
use atelier_moderation::ChatCompletionError;
use atelier_moderation::openai_compat::ChatRequest;
use base64::{Engine, engine::general_purpose::STANDARD};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Data URL of an 8x6 PNG.
pub fn png_data_url() -> String {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 6, Rgb([30, 60, 90])));
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png).unwrap();
    format!("data:image/png;base64,{}", STANDARD.encode(buf.into_inner()))
}

/// Classifier backend with a fixed reply or a fixed failure.
#[derive(Debug, Clone)]
pub struct MockChatClient {
    reply: Result<String, ChatCompletionError>,
    hang: bool,
    calls: Arc<AtomicUsize>,
}

impl MockChatClient {
    /// Backend replying with `text`.
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            hang: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Backend that never answers.
    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::replying("safe")
        }
    }

    /// Backend failing every call.
    pub fn failing() -> Self {
        Self {
            reply: Err(ChatCompletionError::Http("connection refused".to_string())),
            hang: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of completions requested.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatCompletion for MockChatClient {
    async fn complete(&self, _request: &ChatRequest) -> Result<String, ChatCompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.hang {
            std::future::pending::<()>().await;
        }
        self.reply.clone()
    }
}

/// Job queue accepting every submission and replaying status responses.
/// Once the script is exhausted the job stays `IN_PROGRESS`.
#[derive(Debug, Clone)]
pub struct ScriptedTransport {
    rejection: Option<(u16, String)>,
    polls: Arc<Mutex<VecDeque<StatusResponse>>>,
    submissions: Arc<AtomicUsize>,
    status_calls: Arc<AtomicUsize>,
}

impl ScriptedTransport {
    /// Accepting queue answering with `statuses` in order.
    pub fn accepting(statuses: Vec<StatusResponse>) -> Self {
        Self {
            rejection: None,
            polls: Arc::new(Mutex::new(statuses.into())),
            submissions: Arc::new(AtomicUsize::new(0)),
            status_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Queue rejecting submissions with `status_code` and `body`.
    pub fn rejecting(status_code: u16, body: &str) -> Self {
        Self {
            rejection: Some((status_code, body.to_string())),
            ..Self::accepting(vec![])
        }
    }

    /// Number of submissions received.
    pub fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }

    /// Number of status calls received.
    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobTransport for ScriptedTransport {
    async fn submit(&self, _request: &JobRequest) -> Result<SubmitResponse, GenerationError> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        match &self.rejection {
            Some((status_code, body)) => Err(GenerationError::new(GenerationErrorKind::Submission {
                status_code: *status_code,
                body: body.clone(),
            })),
            None => Ok(SubmitResponse {
                id: Some("job-abc".to_string()),
            }),
        }
    }

    async fn status(&self, _job_id: &str) -> Result<StatusResponse, GenerationError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.polls.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| StatusResponse::pending(JobStatus::InProgress)))
    }
}
