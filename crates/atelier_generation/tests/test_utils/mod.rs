//! Test utilities for generation tests.
//!
//! Provides a local HTTP stub server, a scripted job transport and a tiny
//! valid PNG data URL.

pub mod http_stub;

use async_trait::async_trait;
use atelier_error::{GenerationError, GenerationErrorKind};
use atelier_generation::{JobRequest, JobStatus, JobTransport, StatusResponse, SubmitResponse};
use base64::{Engine, engine::general_purpose::STANDARD};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

/// Data URL of a 4x3 PNG.
pub fn png_data_url() -> String {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 3, Rgb([200, 120, 40])));
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png).unwrap();
    format!("data:image/png;base64,{}", STANDARD.encode(buf.into_inner()))
}

/// Answer to the submission call.
#[derive(Debug, Clone)]
pub enum SubmitBehavior {
    /// Accept and return this job id
    Accept(String),
    /// Accept without a job id
    AcceptWithoutId,
    /// Reject with status and body
    Reject(u16, String),
    /// Fail at the network level
    Unreachable(String),
}

/// Answer to one status call.
#[derive(Debug, Clone)]
pub enum PollStep {
    /// Return this response
    Respond(StatusResponse),
    /// Fail at the network level
    Unreachable(String),
}

#[derive(Debug, Default)]
struct Calls {
    submissions: Vec<JobRequest>,
    polled_ids: Vec<String>,
}

/// Transport replaying a fixed script. When the poll script runs out the
/// job stays `IN_PROGRESS` forever.
#[derive(Debug, Clone)]
pub struct ScriptedTransport {
    submit: SubmitBehavior,
    polls: Arc<Mutex<VecDeque<PollStep>>>,
    calls: Arc<Mutex<Calls>>,
}

impl ScriptedTransport {
    /// Script a submission answer and the poll responses that follow.
    pub fn new(submit: SubmitBehavior, polls: Vec<PollStep>) -> Self {
        Self {
            submit,
            polls: Arc::new(Mutex::new(polls.into())),
            calls: Arc::new(Mutex::new(Calls::default())),
        }
    }

    /// Accepting transport returning `statuses` in order.
    pub fn accepting(statuses: Vec<StatusResponse>) -> Self {
        Self::new(
            SubmitBehavior::Accept("job-123".to_string()),
            statuses.into_iter().map(PollStep::Respond).collect(),
        )
    }

    /// Number of submissions received.
    pub fn submit_count(&self) -> usize {
        self.calls.lock().unwrap().submissions.len()
    }

    /// Submissions received.
    pub fn submissions(&self) -> Vec<JobRequest> {
        self.calls.lock().unwrap().submissions.clone()
    }

    /// Number of status calls received.
    pub fn poll_count(&self) -> usize {
        self.calls.lock().unwrap().polled_ids.len()
    }

    /// Job ids that were polled, in order.
    pub fn polled_ids(&self) -> Vec<String> {
        self.calls.lock().unwrap().polled_ids.clone()
    }
}

#[async_trait]
impl JobTransport for ScriptedTransport {
    async fn submit(&self, request: &JobRequest) -> Result<SubmitResponse, GenerationError> {
        self.calls.lock().unwrap().submissions.push(request.clone());
        match &self.submit {
            SubmitBehavior::Accept(id) => Ok(SubmitResponse { id: Some(id.clone()) }),
            SubmitBehavior::AcceptWithoutId => Ok(SubmitResponse { id: None }),
            SubmitBehavior::Reject(status_code, body) => {
                Err(GenerationError::new(GenerationErrorKind::Submission {
                    status_code: *status_code,
                    body: body.clone(),
                }))
            }
            SubmitBehavior::Unreachable(msg) => Err(GenerationError::new(
                GenerationErrorKind::SubmissionTransport(msg.clone()),
            )),
        }
    }

    async fn status(&self, job_id: &str) -> Result<StatusResponse, GenerationError> {
        self.calls.lock().unwrap().polled_ids.push(job_id.to_string());
        let step = self.polls.lock().unwrap().pop_front();
        match step {
            Some(PollStep::Respond(response)) => Ok(response),
            Some(PollStep::Unreachable(msg)) => {
                Err(GenerationError::new(GenerationErrorKind::Polling(msg)))
            }
            None => Ok(StatusResponse::pending(JobStatus::InProgress)),
        }
    }
}
