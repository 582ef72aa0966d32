//! HTTP access to the job queue.

use crate::{JobRequest, StatusResponse, SubmitResponse};
use async_trait::async_trait;
use atelier_core::GenerationConfig;
use atelier_error::{ConfigError, GenerationError, GenerationErrorKind};
use reqwest::Client;
use tracing::{debug, error, instrument};

/// The two calls the poller makes against the job queue.
#[async_trait]
pub trait JobTransport: Send + Sync {
    /// Submit a job.
    ///
    /// A non-success status must surface as [`GenerationErrorKind::Submission`].
    async fn submit(&self, request: &JobRequest) -> Result<SubmitResponse, GenerationError>;

    /// Read the current status of a job.
    async fn status(&self, job_id: &str) -> Result<StatusResponse, GenerationError>;
}

/// [`JobTransport`] over HTTPS with bearer authentication.
#[derive(Debug, Clone)]
pub struct HttpJobTransport {
    client: Client,
    config: GenerationConfig,
}

impl HttpJobTransport {
    /// Create a transport for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key or endpoint is missing.
    #[instrument(skip(config), fields(endpoint = %config.endpoint_url()))]
    pub fn new(config: GenerationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!(status_base = %config.status_base(), "Created job transport");
        Ok(Self {
            client: Client::new(),
            config,
        })
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.config.api_key())
    }
}

#[async_trait]
impl JobTransport for HttpJobTransport {
    #[instrument(skip(self, request), fields(endpoint = %self.config.endpoint_url()))]
    async fn submit(&self, request: &JobRequest) -> Result<SubmitResponse, GenerationError> {
        let response = self
            .client
            .post(self.config.endpoint_url())
            .header("Authorization", self.bearer())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Submission request failed");
                GenerationError::new(GenerationErrorKind::SubmissionTransport(e.to_string()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Submission rejected");
            return Err(GenerationError::new(GenerationErrorKind::Submission {
                status_code: status.as_u16(),
                body,
            }));
        }

        response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse submission response");
            GenerationError::new(GenerationErrorKind::SubmissionTransport(format!(
                "Failed to parse submission response: {}",
                e
            )))
        })
    }

    #[instrument(skip(self))]
    async fn status(&self, job_id: &str) -> Result<StatusResponse, GenerationError> {
        let url = self.config.status_url(job_id);
        let response = self
            .client
            .get(&url)
            .header("Authorization", self.bearer())
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Status request failed");
                GenerationError::new(GenerationErrorKind::Polling(e.to_string()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Status request rejected");
            return Err(GenerationError::new(GenerationErrorKind::Polling(format!(
                "status request returned {}: {}",
                status.as_u16(),
                body
            ))));
        }

        response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse status response");
            GenerationError::new(GenerationErrorKind::Polling(format!(
                "Failed to parse status response: {}",
                e
            )))
        })
    }
}
