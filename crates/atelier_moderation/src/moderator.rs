//! Both moderation layers behind one call.

use crate::{Blocklist, ChatCompletion, OpenAICompatibleClient, SafetyClassifier};
use atelier_core::{BlocklistConfig, ClassifierConfig};
use atelier_error::ConfigError;
use tracing::{debug, instrument};

/// Verdict over a prompt after both moderation layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationVerdict {
    /// Passed both layers
    Safe,
    /// Stopped by the blocklist with the matching terms
    BlockedByKeyword(Vec<String>),
    /// Stopped by the classifier with its reason, if it gave one
    BlockedByClassifier(Option<String>),
}

impl ModerationVerdict {
    /// True for [`ModerationVerdict::Safe`].
    pub fn is_safe(&self) -> bool {
        matches!(self, ModerationVerdict::Safe)
    }
}

/// Runs the blocklist, then the classifier only if the blocklist passed.
#[derive(Debug, Clone)]
pub struct Moderator<C: ChatCompletion> {
    blocklist: Blocklist,
    classifier: SafetyClassifier<C>,
}

impl Moderator<OpenAICompatibleClient> {
    /// Both layers from configuration, the classifier talking HTTP.
    ///
    /// Only the classifier key is required; the job service need not be
    /// configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the classifier key is missing or a blocklist term
    /// cannot be compiled.
    pub fn from_config(
        blocklist: &BlocklistConfig,
        classifier: &ClassifierConfig,
    ) -> Result<Self, ConfigError> {
        let client = OpenAICompatibleClient::from_config(classifier)?;
        Ok(Self::new(
            Blocklist::from_config(blocklist)?,
            SafetyClassifier::new(client, classifier.clone()),
        ))
    }
}

impl<C: ChatCompletion> Moderator<C> {
    /// Combine the two layers.
    pub fn new(blocklist: Blocklist, classifier: SafetyClassifier<C>) -> Self {
        Self {
            blocklist,
            classifier,
        }
    }

    /// The keyword layer.
    pub fn blocklist(&self) -> &Blocklist {
        &self.blocklist
    }

    /// The language-model layer.
    pub fn classifier(&self) -> &SafetyClassifier<C> {
        &self.classifier
    }

    /// Moderate a prompt.
    #[instrument(skip(self, text))]
    pub async fn moderate(&self, text: &str) -> ModerationVerdict {
        let keywords = self.blocklist.check(text);
        if keywords.flagged {
            debug!(terms = ?keywords.matched_terms, "Blocked by keyword layer");
            return ModerationVerdict::BlockedByKeyword(keywords.matched_terms);
        }

        let verdict = self.classifier.classify(text).await;
        if !verdict.is_safe {
            debug!(reason = ?verdict.reason, "Blocked by classifier layer");
            return ModerationVerdict::BlockedByClassifier(verdict.reason);
        }

        ModerationVerdict::Safe
    }
}
