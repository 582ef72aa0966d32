//! Moderation-gated image generation.
//!
//! A prompt goes through a keyword blocklist and a language-model safety
//! check before it is submitted to a remote image-generation job queue. The
//! [`ModeratedGenerationWorkflow`] ties the layers together and reports a
//! single [`GenerationOutcome`] per prompt.
//!
//! # Example
//!
//! ```no_run
//! use atelier::{AtelierConfig, ModeratedGenerationWorkflow};
//!
//! # async fn run() -> atelier::AtelierResult<()> {
//! let config = AtelierConfig::load(None)?;
//! let workflow = ModeratedGenerationWorkflow::from_config(&config)?;
//! let outcome = workflow.run("un castello medievale al tramonto").await;
//! println!("{}", outcome.user_message());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod workflow;

pub use workflow::{GenerationOutcome, ModeratedGenerationWorkflow, WorkflowStage};

pub use atelier_core::{
    AtelierConfig, BlocklistCategory, BlocklistConfig, ClassifierConfig, FailurePolicy,
    GeneratedImage, GenerationConfig, LogConfig, MatchMode, Prompt, init_tracing,
};
pub use atelier_error::{
    AtelierError, AtelierErrorKind, AtelierResult, ConfigError, GenerationError,
    GenerationErrorKind, StorageError,
};
pub use atelier_generation::{
    HttpJobTransport, ImageGenerator, JobStatus, JobTransport, NoopObserver, PollObserver,
};
pub use atelier_moderation::{
    Blocklist, ChatCompletion, ClassifierVerdict, KeywordCheck, ModerationVerdict, Moderator,
    OpenAICompatibleClient, SafetyClassifier, check_keywords,
};
pub use atelier_storage::{GenerationLog, GenerationLogRecord};
pub use tokio_util::sync::CancellationToken;
