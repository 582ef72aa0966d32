//! Error types for the Atelier moderated image generation workflow.
//!
//! Each layer owns a location-tracked error struct; [`AtelierError`] wraps
//! them for callers that cross layers (configuration loading, the CLI).

mod config;
mod generation;
mod storage;

pub use config::ConfigError;
pub use generation::{GenerationError, GenerationErrorKind};
pub use storage::{StorageError, StorageErrorKind};

/// Crate-level error variants.
#[derive(Debug, derive_more::From, derive_more::Display)]
pub enum AtelierErrorKind {
    /// Configuration error
    #[display("{}", _0)]
    Config(ConfigError),
    /// Generation job error
    #[display("{}", _0)]
    Generation(GenerationError),
    /// Generation log error
    #[display("{}", _0)]
    Storage(StorageError),
}

/// Atelier error with kind discrimination.
#[derive(Debug)]
pub struct AtelierError(Box<AtelierErrorKind>);

impl AtelierError {
    /// Create a new error from a kind.
    pub fn new(kind: AtelierErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &AtelierErrorKind {
        &self.0
    }
}

impl std::fmt::Display for AtelierError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Atelier Error: {}", self.0)
    }
}

impl std::error::Error for AtelierError {}

// Generic From implementation for any type that converts to AtelierErrorKind
impl<T> From<T> for AtelierError
where
    T: Into<AtelierErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Atelier operations.
pub type AtelierResult<T> = std::result::Result<T, AtelierError>;
