//! User prompt text.

use serde::{Deserialize, Serialize};

/// A user-supplied text prompt, any language, any length.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
    derive_more::Deref,
)]
#[serde(transparent)]
pub struct Prompt(String);

impl Prompt {
    /// Create a prompt.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The prompt text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for empty or whitespace-only prompts.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for Prompt {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_prompts() {
        assert!(Prompt::new("").is_blank());
        assert!(Prompt::new(" \n\t ").is_blank());
        assert!(!Prompt::new("un castello").is_blank());
    }
}
