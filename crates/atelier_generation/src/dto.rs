//! Wire types of the job queue API.

use serde::{Deserialize, Serialize};

/// Suppression hint sent with every job; not a security control.
pub const NEGATIVE_PROMPT: &str = "brutto, sfocato, bassa qualità, nsfw, nudo, contenuto esplicito, \
violenza, sangue, gore, inquietante, spaventoso, contenuto inappropriato";

/// Model input carried by a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobInput {
    /// User prompt
    pub prompt: String,
    /// Attributes the model should avoid
    pub negative_prompt: String,
}

/// Body of the submission POST: `{"input": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequest {
    /// Model input
    pub input: JobInput,
}

impl JobRequest {
    /// Request for a prompt with the fixed negative prompt.
    pub fn for_prompt(prompt: impl Into<String>) -> Self {
        Self {
            input: JobInput {
                prompt: prompt.into(),
                negative_prompt: NEGATIVE_PROMPT.to_string(),
            },
        }
    }
}

/// Body of a successful submission response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    /// Job identifier issued by the queue
    #[serde(default)]
    pub id: Option<String>,
}

/// Lifecycle state reported by the status endpoint.
///
/// Only `COMPLETED` and `FAILED` are terminal; any other value keeps the
/// poller waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Waiting for a worker
    #[display("IN_QUEUE")]
    InQueue,
    /// Running on a worker
    #[display("IN_PROGRESS")]
    InProgress,
    /// Finished with output
    #[display("COMPLETED")]
    Completed,
    /// Finished with an error
    #[display("FAILED")]
    Failed,
    /// Any status this client does not know
    #[serde(other)]
    #[display("UNKNOWN")]
    Unknown,
}

impl JobStatus {
    /// True for `COMPLETED` and `FAILED`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Output section of a completed job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOutput {
    /// Data URL carrying the image
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Body of a status response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Current state
    pub status: JobStatus,
    /// Present once the job completed
    #[serde(default)]
    pub output: Option<JobOutput>,
    /// Present when the job failed
    #[serde(default)]
    pub error: Option<String>,
}

impl StatusResponse {
    /// Non-terminal response in the given state.
    pub fn pending(status: JobStatus) -> Self {
        Self {
            status,
            output: None,
            error: None,
        }
    }

    /// Completed response carrying a data URL.
    pub fn completed(image_url: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Completed,
            output: Some(JobOutput {
                image_url: Some(image_url.into()),
            }),
            error: None,
        }
    }

    /// Failed response with an optional error message.
    pub fn failed(error: Option<String>) -> Self {
        Self {
            status: JobStatus::Failed,
            output: None,
            error,
        }
    }

    /// Data URL of the image, if the output has one.
    pub fn image_url(&self) -> Option<&str> {
        self.output.as_ref().and_then(|o| o.image_url.as_deref())
    }
}
