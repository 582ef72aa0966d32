//! Two-layer prompt moderation.
//!
//! 1. **Keyword layer** - [`Blocklist`], pure and local
//! 2. **Classifier layer** - [`SafetyClassifier`], one chat completion call
//!
//! [`Moderator`] runs them in that order and stops at the first rejection.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod blocklist;
mod classifier;
mod moderator;
pub mod openai_compat;

pub use blocklist::{Blocklist, KeywordCheck, check_keywords, default_categories};
pub use classifier::{
    ClassifierVerdict, MODERATION_INSTRUCTION, REASON_DELIMITER, SafetyClassifier,
    UNAVAILABLE_REASON,
};
pub use moderator::{ModerationVerdict, Moderator};
pub use openai_compat::{ChatCompletion, ChatCompletionError, OpenAICompatibleClient};
