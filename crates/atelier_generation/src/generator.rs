//! Job submission and status polling.

use crate::{
    HttpJobTransport, JobRequest, JobStatus, JobTransport, NoopObserver, PollObserver,
    decode_data_url,
};
use atelier_core::{GeneratedImage, GenerationConfig};
use atelier_error::{ConfigError, GenerationError, GenerationErrorKind};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Submits a prompt to the job queue and polls until the job is terminal.
///
/// Polls are spaced by a fixed interval. The whole job is bounded by the
/// configured timeout and can be aborted with a [`CancellationToken`].
#[derive(Debug, Clone)]
pub struct ImageGenerator<T: JobTransport> {
    transport: T,
    poll_interval: Duration,
    timeout: Option<Duration>,
}

impl ImageGenerator<HttpJobTransport> {
    /// Generator talking HTTP to the configured job queue.
    pub fn from_config(config: &GenerationConfig) -> Result<Self, ConfigError> {
        let transport = HttpJobTransport::new(config.clone())?;
        Ok(Self::new(transport, config))
    }
}

impl<T: JobTransport> ImageGenerator<T> {
    /// Generator over any transport, timed by `config`.
    pub fn new(transport: T, config: &GenerationConfig) -> Self {
        Self {
            transport,
            poll_interval: config.poll_interval(),
            timeout: config.timeout(),
        }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Interval between polls.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Generate an image with no progress reporting and no cancellation.
    pub async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, GenerationError> {
        self.generate_image_with(prompt, &NoopObserver, &CancellationToken::new())
            .await
    }

    /// Generate an image, reporting progress to `observer`.
    ///
    /// Returns [`GenerationErrorKind::Cancelled`] once `cancel` fires and
    /// [`GenerationErrorKind::Timeout`] when the configured limit elapses.
    #[instrument(skip(self, prompt, observer, cancel), fields(prompt_len = prompt.len()))]
    pub async fn generate_image_with(
        &self,
        prompt: &str,
        observer: &dyn PollObserver,
        cancel: &CancellationToken,
    ) -> Result<GeneratedImage, GenerationError> {
        let job = self.run(prompt, observer);
        let bounded = async {
            match self.timeout {
                Some(limit) => match tokio::time::timeout(limit, job).await {
                    Ok(result) => result,
                    Err(_) => {
                        warn!(timeout_secs = limit.as_secs(), "Generation timed out");
                        Err(GenerationError::new(GenerationErrorKind::Timeout {
                            secs: limit.as_secs(),
                        }))
                    }
                },
                None => job.await,
            }
        };

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("Generation cancelled");
                Err(GenerationError::new(GenerationErrorKind::Cancelled))
            }
            result = bounded => result,
        };

        observer.on_finished(result.is_ok());
        result
    }

    async fn run(
        &self,
        prompt: &str,
        observer: &dyn PollObserver,
    ) -> Result<GeneratedImage, GenerationError> {
        let submitted = self.transport.submit(&JobRequest::for_prompt(prompt)).await?;
        let job_id = submitted
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| GenerationError::new(GenerationErrorKind::MissingJobId))?;

        info!(job_id = %job_id, "Job submitted");
        observer.on_submitted(&job_id);

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let response = self.transport.status(&job_id).await?;
            debug!(job_id = %job_id, attempt, status = %response.status, "Polled job status");
            observer.on_poll(attempt, response.status);

            if !response.status.is_terminal() {
                tokio::time::sleep(self.poll_interval).await;
                continue;
            }

            if response.status == JobStatus::Failed {
                let message = response
                    .error
                    .unwrap_or_else(|| "Unknown error".to_string());
                warn!(job_id = %job_id, error = %message, "Job failed");
                return Err(GenerationError::new(
                    GenerationErrorKind::RemoteJobFailure(message),
                ));
            }

            let data_url = response
                .image_url()
                .ok_or_else(|| GenerationError::new(GenerationErrorKind::MissingImage))?;
            let image = decode_data_url(data_url)?;
            info!(
                job_id = %job_id,
                attempts = attempt,
                width = image.width(),
                height = image.height(),
                "Job completed"
            );
            return Ok(image);
        }
    }
}
