//! Language-model safety classifier, the second moderation layer.

use crate::openai_compat::{ChatCompletion, ChatCompletionError, ChatMessage, ChatRequest};
use atelier_core::{ClassifierConfig, FailurePolicy};
use tracing::{debug, info, instrument, warn};

/// System instruction sent with every prompt.
pub const MODERATION_INSTRUCTION: &str = "You are a content moderator. \
Analyze the following prompt for inappropriate content including:
- Violence or gore
- Adult or explicit content
- Hate speech or discrimination
- Dangerous or illegal activities
Respond with only 'safe' or 'unsafe' followed by a brief reason if unsafe.";

/// Marker separating the verdict from the reason in an unsafe reply.
pub const REASON_DELIMITER: &str = "unsafe:";

/// Reason reported under [`FailurePolicy::FailClosed`] when the call fails.
pub const UNAVAILABLE_REASON: &str = "safety classifier unavailable";

/// Outcome of one classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierVerdict {
    /// True iff the model's reply starts with "safe"
    pub is_safe: bool,
    /// Text after the last `unsafe:` marker, when present
    pub reason: Option<String>,
}

impl ClassifierVerdict {
    /// A passing verdict.
    pub fn safe() -> Self {
        Self {
            is_safe: true,
            reason: None,
        }
    }

    /// A failing verdict.
    pub fn unsafe_because(reason: Option<String>) -> Self {
        Self {
            is_safe: false,
            reason,
        }
    }

    /// Interpret a model reply.
    ///
    /// The reply is trimmed and lowercased. Anything not starting with
    /// `safe` is unsafe; the reason is the trimmed text after the last
    /// `unsafe:` marker, or `None` without a marker.
    pub fn parse(reply: &str) -> Self {
        let normalized = reply.trim().to_lowercase();
        if normalized.starts_with("safe") {
            return Self::safe();
        }
        let reason = normalized
            .rsplit_once(REASON_DELIMITER)
            .map(|(_, rest)| rest.trim().to_string())
            .filter(|rest| !rest.is_empty());
        Self::unsafe_because(reason)
    }
}

/// Asks a chat model whether a prompt is acceptable.
///
/// One request per call, no retries. On a transport or API failure the
/// verdict follows the configured [`FailurePolicy`].
#[derive(Debug, Clone)]
pub struct SafetyClassifier<C: ChatCompletion> {
    client: C,
    config: ClassifierConfig,
}

impl<C: ChatCompletion> SafetyClassifier<C> {
    /// Create a classifier over a chat completion backend.
    pub fn new(client: C, config: ClassifierConfig) -> Self {
        Self { client, config }
    }

    /// Settings in use.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    fn request_for(&self, text: &str) -> Result<ChatRequest, ChatCompletionError> {
        let request = ChatRequest::builder()
            .model(self.config.model().clone())
            .messages(vec![
                ChatMessage::system(MODERATION_INSTRUCTION),
                ChatMessage::user(text),
            ])
            .temperature(Some(*self.config.temperature()))
            .max_tokens(Some(*self.config.max_tokens()))
            .build()?;
        Ok(request)
    }

    /// Classify a prompt.
    #[instrument(skip(self, text), fields(model = %self.config.model(), text_len = text.len()))]
    pub async fn classify(&self, text: &str) -> ClassifierVerdict {
        let reply = match self.request_for(text) {
            Ok(request) => self.client.complete(&request).await,
            Err(e) => Err(e),
        };

        match reply {
            Ok(reply) => {
                debug!(reply = %reply, "Classifier replied");
                let verdict = ClassifierVerdict::parse(&reply);
                info!(is_safe = verdict.is_safe, reason = ?verdict.reason, "Classification complete");
                verdict
            }
            Err(error) => match self.config.failure_policy() {
                FailurePolicy::FailOpen => {
                    warn!(%error, "Classifier call failed, treating prompt as safe");
                    ClassifierVerdict::safe()
                }
                FailurePolicy::FailClosed => {
                    warn!(%error, "Classifier call failed, treating prompt as unsafe");
                    ClassifierVerdict::unsafe_because(Some(UNAVAILABLE_REASON.to_string()))
                }
            },
        }
    }
}
