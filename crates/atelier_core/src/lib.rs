//! Core data types and configuration for Atelier.
//!
//! This crate holds what every layer shares: the prompt and image types,
//! the layered configuration, and tracing setup.

mod config;
mod media;
mod observability;
mod prompt;

pub use config::{
    AtelierConfig, BlocklistCategory, BlocklistConfig, ClassifierConfig, ClassifierConfigBuilder,
    FailurePolicy, GenerationConfig, GenerationConfigBuilder, LogConfig, MatchMode,
    CLASSIFIER_API_KEY_VAR, ENDPOINT_URL_VAR, JOB_API_KEY_VAR,
};
pub use media::GeneratedImage;
pub use observability::{LOG_FORMAT_VAR, init_tracing};
pub use prompt::Prompt;
