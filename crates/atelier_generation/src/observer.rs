//! Progress hook for front ends.

use crate::JobStatus;

/// Receives progress while a job runs, so a front end can show a spinner.
pub trait PollObserver: Send + Sync {
    /// The queue accepted the job.
    fn on_submitted(&self, _job_id: &str) {}

    /// A status poll returned.
    fn on_poll(&self, _attempt: u32, _status: JobStatus) {}

    /// The job ended, successfully or not.
    fn on_finished(&self, _success: bool) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PollObserver for NoopObserver {}
