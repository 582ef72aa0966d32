//! Prompt to image, gated by both moderation layers.

use atelier_core::{AtelierConfig, GeneratedImage, Prompt};
use atelier_error::{AtelierResult, GenerationErrorKind};
use atelier_generation::{HttpJobTransport, ImageGenerator, JobTransport, NoopObserver, PollObserver};
use atelier_moderation::{ChatCompletion, ModerationVerdict, Moderator, OpenAICompatibleClient};
use atelier_storage::{GenerationLog, GenerationLogRecord};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Progress of one prompt through the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum WorkflowStage {
    /// Nothing checked yet
    Idle,
    /// Passed the blocklist
    KeywordChecked,
    /// Passed the classifier
    ClassifierChecked,
    /// Job handed to the queue
    Submitted,
    /// Outcome decided
    Done,
}

/// How a prompt ended. Every failure is reported here; nothing escapes as an error.
#[derive(Debug, Clone)]
pub enum GenerationOutcome {
    /// The prompt was empty or whitespace
    RejectedEmpty,
    /// The blocklist matched these terms
    RejectedByKeyword(Vec<String>),
    /// The classifier judged the prompt unsafe, with its reason if given
    RejectedByClassifier(Option<String>),
    /// Submission, polling, the remote job or decoding failed
    GenerationFailed(String),
    /// The image is ready
    Generated(GeneratedImage),
}

impl GenerationOutcome {
    /// True when an image was produced.
    pub fn is_generated(&self) -> bool {
        matches!(self, GenerationOutcome::Generated(_))
    }

    /// The produced image, if any.
    pub fn image(&self) -> Option<&GeneratedImage> {
        match self {
            GenerationOutcome::Generated(image) => Some(image),
            _ => None,
        }
    }

    /// Short machine-readable name, used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            GenerationOutcome::RejectedEmpty => "rejected_empty",
            GenerationOutcome::RejectedByKeyword(_) => "rejected_by_keyword",
            GenerationOutcome::RejectedByClassifier(_) => "rejected_by_classifier",
            GenerationOutcome::GenerationFailed(_) => "generation_failed",
            GenerationOutcome::Generated(_) => "generated",
        }
    }

    /// Message shown to the person who typed the prompt.
    ///
    /// Rejections never reveal which term or reason triggered them.
    pub fn user_message(&self) -> String {
        match self {
            GenerationOutcome::RejectedEmpty => {
                "Per favore, inserisci prima una descrizione!".to_string()
            }
            GenerationOutcome::RejectedByKeyword(_) => {
                "La tua richiesta contiene contenuti non appropriati. \
                 Per favore, modifica la descrizione e riprova."
                    .to_string()
            }
            GenerationOutcome::RejectedByClassifier(_) => {
                "La tua richiesta è stata identificata come inappropriata.".to_string()
            }
            GenerationOutcome::GenerationFailed(message) => message.clone(),
            GenerationOutcome::Generated(image) => {
                format!("Immagine generata ({}x{})", image.width(), image.height())
            }
        }
    }
}

/// Runs blocklist, classifier and generation in order, stopping at the first
/// rejection or failure.
///
/// Each run is independent. Successful generations are appended to the
/// optional [`GenerationLog`].
#[derive(Debug)]
pub struct ModeratedGenerationWorkflow<C: ChatCompletion, T: JobTransport> {
    moderator: Moderator<C>,
    generator: ImageGenerator<T>,
    log: Option<GenerationLog>,
    group_members: String,
}

impl ModeratedGenerationWorkflow<OpenAICompatibleClient, HttpJobTransport> {
    /// Wire the HTTP-backed layers from configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a required key or URL is missing
    /// or a blocklist term cannot be compiled.
    #[instrument(skip(config))]
    pub fn from_config(config: &AtelierConfig) -> AtelierResult<Self> {
        let moderator = Moderator::from_config(config.blocklist(), config.classifier())?;
        let generator = ImageGenerator::from_config(config.generation())?;

        let workflow = Self::new(moderator, generator);
        let log = config.log();
        if *log.enabled() {
            debug!(path = %log.path().display(), "Generation log enabled");
            return Ok(workflow.with_log(GenerationLog::new(log.path()), log.group_members()));
        }
        Ok(workflow)
    }
}

impl<C: ChatCompletion, T: JobTransport> ModeratedGenerationWorkflow<C, T> {
    /// Workflow over the given layers, without a log.
    pub fn new(moderator: Moderator<C>, generator: ImageGenerator<T>) -> Self {
        Self {
            moderator,
            generator,
            log: None,
            group_members: String::new(),
        }
    }

    /// Append every successful generation to `log`, attributed to `group_members`.
    pub fn with_log(mut self, log: GenerationLog, group_members: impl Into<String>) -> Self {
        self.log = Some(log);
        self.group_members = group_members.into();
        self
    }

    /// The moderation layers.
    pub fn moderator(&self) -> &Moderator<C> {
        &self.moderator
    }

    /// The job submitter.
    pub fn generator(&self) -> &ImageGenerator<T> {
        &self.generator
    }

    /// The generation log, when enabled.
    pub fn log(&self) -> Option<&GenerationLog> {
        self.log.as_ref()
    }

    /// Run only the two moderation layers.
    pub async fn check(&self, prompt: &str) -> ModerationVerdict {
        self.moderator.moderate(prompt).await
    }

    /// Run the whole workflow with no progress reporting.
    pub async fn run(&self, prompt: &str) -> GenerationOutcome {
        self.run_with(prompt, &NoopObserver, &CancellationToken::new())
            .await
    }

    /// Run the whole workflow, reporting job progress to `observer`.
    ///
    /// Cancelling `cancel` during moderation or while the job runs ends the
    /// run with [`GenerationOutcome::GenerationFailed`].
    #[instrument(skip(self, prompt, observer, cancel), fields(prompt_len = prompt.len()))]
    pub async fn run_with(
        &self,
        prompt: &str,
        observer: &dyn PollObserver,
        cancel: &CancellationToken,
    ) -> GenerationOutcome {
        let prompt = Prompt::new(prompt);
        let outcome = self.drive(&prompt, observer, cancel).await;
        info!(outcome = outcome.label(), "Workflow finished");
        outcome
    }

    async fn drive(
        &self,
        prompt: &Prompt,
        observer: &dyn PollObserver,
        cancel: &CancellationToken,
    ) -> GenerationOutcome {
        if prompt.is_blank() {
            return GenerationOutcome::RejectedEmpty;
        }

        let mut stage = WorkflowStage::Idle;

        let verdict = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!(stage = %stage, "Cancelled during moderation");
                return GenerationOutcome::GenerationFailed(
                    GenerationErrorKind::Cancelled.to_string(),
                );
            }
            verdict = self.moderator.moderate(prompt) => verdict,
        };

        match verdict {
            ModerationVerdict::BlockedByKeyword(terms) => {
                debug!(stage = %stage, terms = ?terms, "Rejected by blocklist");
                return GenerationOutcome::RejectedByKeyword(terms);
            }
            ModerationVerdict::BlockedByClassifier(reason) => {
                stage = advance(stage, WorkflowStage::KeywordChecked);
                debug!(stage = %stage, reason = ?reason, "Rejected by classifier");
                return GenerationOutcome::RejectedByClassifier(reason);
            }
            ModerationVerdict::Safe => {
                stage = advance(stage, WorkflowStage::KeywordChecked);
                stage = advance(stage, WorkflowStage::ClassifierChecked);
            }
        }

        stage = advance(stage, WorkflowStage::Submitted);
        let result = self
            .generator
            .generate_image_with(prompt, observer, cancel)
            .await;
        advance(stage, WorkflowStage::Done);

        match result {
            Ok(image) => {
                self.record(prompt, &image);
                GenerationOutcome::Generated(image)
            }
            Err(e) => {
                warn!(error = %e, job_submitted = !e.kind.is_submission(), "Generation failed");
                GenerationOutcome::GenerationFailed(e.kind.to_string())
            }
        }
    }

    fn record(&self, prompt: &Prompt, image: &GeneratedImage) {
        let Some(log) = &self.log else {
            return;
        };
        let appended = GenerationLogRecord::from_generation(prompt, image, &self.group_members)
            .and_then(|record| log.append(&record));
        match appended {
            Ok(()) => debug!(path = %log.path().display(), "Generation logged"),
            Err(e) => warn!(error = %e, "Failed to append to generation log"),
        }
    }
}

fn advance(from: WorkflowStage, to: WorkflowStage) -> WorkflowStage {
    debug!(from = %from, to = %to, "Workflow stage");
    to
}
