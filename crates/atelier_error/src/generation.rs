//! Image generation job error types.

/// Failure conditions of a generation job, from submission to decoding.
///
/// The `Display` of a kind is the message shown to the user, so it carries
/// no source location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GenerationErrorKind {
    /// Submission was answered with a non-success HTTP status
    Submission {
        /// HTTP status code
        status_code: u16,
        /// Response body as returned by the service
        body: String,
    },
    /// Network failure while submitting the job
    SubmissionTransport(String),
    /// Submission response carried no job identifier
    MissingJobId,
    /// Network or parse failure while reading job status
    Polling(String),
    /// Remote service reported the job as FAILED
    RemoteJobFailure(String),
    /// Job completed without an image in its output
    MissingImage,
    /// Image payload could not be turned into an image
    Decode(String),
    /// Job did not reach a terminal state in time
    Timeout {
        /// Configured limit in seconds
        secs: u64,
    },
    /// Caller cancelled the job while it was being polled
    Cancelled,
}

impl std::fmt::Display for GenerationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationErrorKind::Submission { status_code, body } => {
                write!(f, "Error: {} - {}", status_code, body)
            }
            GenerationErrorKind::SubmissionTransport(msg) => {
                write!(f, "Error during image generation: {}", msg)
            }
            GenerationErrorKind::MissingJobId => write!(
                f,
                "Error during image generation: submission response has no job id"
            ),
            GenerationErrorKind::Polling(msg) => {
                write!(f, "Error during image generation: {}", msg)
            }
            GenerationErrorKind::RemoteJobFailure(msg) => write!(f, "Generation failed: {}", msg),
            GenerationErrorKind::MissingImage => write!(
                f,
                "Error during image generation: completed job has no image_url"
            ),
            GenerationErrorKind::Decode(msg) => {
                write!(f, "Error during image generation: {}", msg)
            }
            GenerationErrorKind::Timeout { secs } => {
                write!(f, "Generation timed out after {} seconds", secs)
            }
            GenerationErrorKind::Cancelled => write!(f, "Generation cancelled"),
        }
    }
}

impl GenerationErrorKind {
    /// True when the failure happened before a job identifier was issued.
    pub fn is_submission(&self) -> bool {
        matches!(
            self,
            GenerationErrorKind::Submission { .. }
                | GenerationErrorKind::SubmissionTransport(_)
                | GenerationErrorKind::MissingJobId
        )
    }
}

/// Generation error with source location tracking.
///
/// # Examples
///
/// ```
/// use atelier_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::RemoteJobFailure(
///     "nsfw content detected".to_string(),
/// ));
/// assert_eq!(err.kind.to_string(), "Generation failed: nsfw content detected");
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &GenerationErrorKind {
        &self.kind
    }
}
