//! Configuration for the moderation layers, the job service and the log.
//!
//! Sources are layered, later ones winning:
//! 1. built-in defaults
//! 2. an optional TOML file
//! 3. `ATELIER__<SECTION>__<KEY>` environment variables
//! 4. the legacy `RUNPOD_API_KEY`, `ENDPOINT_URL` and `OPENAI_API_KEY` variables

use atelier_error::ConfigError;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

/// Legacy variable holding the job service token.
pub const JOB_API_KEY_VAR: &str = "RUNPOD_API_KEY";
/// Legacy variable holding the job submission URL.
pub const ENDPOINT_URL_VAR: &str = "ENDPOINT_URL";
/// Legacy variable holding the chat-completion API key.
pub const CLASSIFIER_API_KEY_VAR: &str = "OPENAI_API_KEY";

const DEFAULT_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o";

fn default_poll_interval_secs() -> u64 {
    2
}

fn default_timeout_secs() -> u64 {
    600
}

fn default_chat_url() -> String {
    DEFAULT_CHAT_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    50
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_log_path() -> PathBuf {
    PathBuf::from("generations.csv")
}

/// What the safety classifier reports when the chat-completion call fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Treat the prompt as safe.
    #[default]
    FailOpen,
    /// Treat the prompt as unsafe.
    FailClosed,
}

/// How blocklist terms are matched against the prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Term may appear anywhere, including inside a longer word.
    #[default]
    Substring,
    /// Term must be delimited by word boundaries.
    WholeWord,
}

/// Remote image-generation job service settings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct GenerationConfig {
    /// Bearer token for the job service
    #[serde(default)]
    api_key: String,
    /// URL receiving the job submission POST
    #[serde(default)]
    endpoint_url: String,
    /// Base URL for `<base>/status/{id}`; derived from `endpoint_url` when unset
    #[serde(default)]
    #[builder(default, setter(into, strip_option))]
    status_base_url: Option<String>,
    /// Seconds between status polls
    #[serde(default = "default_poll_interval_secs")]
    #[builder(default = "default_poll_interval_secs()")]
    poll_interval_secs: u64,
    /// Upper bound on the whole job in seconds, `0` for no bound
    #[serde(default = "default_timeout_secs")]
    #[builder(default = "default_timeout_secs()")]
    timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint_url: String::new(),
            status_base_url: None,
            poll_interval_secs: default_poll_interval_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GenerationConfig {
    /// Create a new builder.
    pub fn builder() -> GenerationConfigBuilder {
        GenerationConfigBuilder::default()
    }

    /// Interval slept between two status polls.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Deadline for a job, `None` when unbounded.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Base of the status endpoint.
    ///
    /// Falls back to the submission URL with a trailing `/run` or `/runsync`
    /// removed, which is how serverless job queues lay out their routes.
    pub fn status_base(&self) -> String {
        if let Some(base) = &self.status_base_url {
            return base.trim_end_matches('/').to_string();
        }
        let endpoint = self.endpoint_url.trim_end_matches('/');
        endpoint
            .strip_suffix("/runsync")
            .or_else(|| endpoint.strip_suffix("/run"))
            .unwrap_or(endpoint)
            .to_string()
    }

    /// Full status URL for a job.
    pub fn status_url(&self, job_id: &str) -> String {
        format!("{}/status/{}", self.status_base(), job_id)
    }

    /// Check that the secrets needed to talk to the service are present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::missing(JOB_API_KEY_VAR));
        }
        if self.endpoint_url.trim().is_empty() {
            return Err(ConfigError::missing(ENDPOINT_URL_VAR));
        }
        Ok(())
    }
}

/// Language-model safety classifier settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct ClassifierConfig {
    /// API key for the chat-completion service
    #[serde(default)]
    api_key: String,
    /// Chat-completions endpoint
    #[serde(default = "default_chat_url")]
    #[builder(default = "default_chat_url()")]
    base_url: String,
    /// Model identifier
    #[serde(default = "default_model")]
    #[builder(default = "default_model()")]
    model: String,
    /// Sampling temperature
    #[serde(default)]
    #[builder(default)]
    temperature: f32,
    /// Output token ceiling for the verdict
    #[serde(default = "default_max_tokens")]
    #[builder(default = "default_max_tokens()")]
    max_tokens: u32,
    /// Verdict to report when the call fails
    #[serde(default)]
    #[builder(default)]
    failure_policy: FailurePolicy,
    /// Seconds before a classifier request is abandoned
    #[serde(default = "default_request_timeout_secs")]
    #[builder(default = "default_request_timeout_secs()")]
    request_timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_chat_url(),
            model: default_model(),
            temperature: 0.0,
            max_tokens: default_max_tokens(),
            failure_policy: FailurePolicy::default(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ClassifierConfig {
    /// Create a new builder.
    pub fn builder() -> ClassifierConfigBuilder {
        ClassifierConfigBuilder::default()
    }

    /// Upper bound on one classifier request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Check that the API key is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::missing(CLASSIFIER_API_KEY_VAR));
        }
        Ok(())
    }
}

/// A named group of blocked terms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct BlocklistCategory {
    /// Category name
    name: String,
    /// Terms in declaration order
    terms: Vec<String>,
}

impl BlocklistCategory {
    /// Create a category from a name and its terms.
    pub fn new<I, S>(name: impl Into<String>, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            terms: terms.into_iter().map(Into::into).collect(),
        }
    }
}

/// Keyword blocklist settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct BlocklistConfig {
    /// Matching strategy
    #[serde(default)]
    match_mode: MatchMode,
    /// Replacement categories; the built-in lists apply when unset
    #[serde(default)]
    categories: Option<Vec<BlocklistCategory>>,
}

impl BlocklistConfig {
    /// Create a blocklist config.
    pub fn new(match_mode: MatchMode, categories: Option<Vec<BlocklistCategory>>) -> Self {
        Self {
            match_mode,
            categories,
        }
    }
}

/// Generation log settings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct LogConfig {
    /// Append a record for every generated image
    #[serde(default)]
    enabled: bool,
    /// CSV file path
    #[serde(default = "default_log_path")]
    path: PathBuf,
    /// Free-text attribution stored with each record
    #[serde(default)]
    group_members: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            group_members: String::new(),
        }
    }
}

impl LogConfig {
    /// Create a log config.
    pub fn new(enabled: bool, path: impl Into<PathBuf>, group_members: impl Into<String>) -> Self {
        Self {
            enabled,
            path: path.into(),
            group_members: group_members.into(),
        }
    }

    /// Same config with a different attribution.
    pub fn with_group_members(mut self, group_members: impl Into<String>) -> Self {
        self.group_members = group_members.into();
        self
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters)]
pub struct AtelierConfig {
    /// Job service
    #[serde(default)]
    generation: GenerationConfig,
    /// Safety classifier
    #[serde(default)]
    classifier: ClassifierConfig,
    /// Keyword blocklist
    #[serde(default)]
    blocklist: BlocklistConfig,
    /// Generation log
    #[serde(default)]
    log: LogConfig,
}

impl AtelierConfig {
    /// Assemble a config from already-built sections.
    pub fn new(
        generation: GenerationConfig,
        classifier: ClassifierConfig,
        blocklist: BlocklistConfig,
        log: LogConfig,
    ) -> Self {
        Self {
            generation,
            classifier,
            blocklist,
            log,
        }
    }

    /// Load from an optional TOML file and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::from_sources(path, &env)
    }

    /// Load from an optional TOML file and an explicit environment map.
    #[instrument(skip(env))]
    pub fn from_sources(
        path: Option<&Path>,
        env: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            debug!("Adding config file source");
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("ATELIER")
                .separator("__")
                .try_parsing(true)
                .source(Some(
                    env.iter()
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect::<config::Map<String, String>>(),
                )),
        );

        let mut loaded: AtelierConfig = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to read config: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        if let Some(key) = env.get(JOB_API_KEY_VAR) {
            loaded.generation.api_key = key.clone();
        }
        if let Some(url) = env.get(ENDPOINT_URL_VAR) {
            loaded.generation.endpoint_url = url.clone();
        }
        if let Some(key) = env.get(CLASSIFIER_API_KEY_VAR) {
            loaded.classifier.api_key = key.clone();
        }

        debug!(
            endpoint = %loaded.generation.endpoint_url,
            model = %loaded.classifier.model,
            log_enabled = loaded.log.enabled,
            "Configuration loaded"
        );
        Ok(loaded)
    }

    /// Replace the log section.
    pub fn with_log(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }
}
