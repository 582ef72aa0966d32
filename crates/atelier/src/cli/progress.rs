//! Terminal spinner shown while a job is polled.

use atelier::{JobStatus, PollObserver};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// [`PollObserver`] drawing an indeterminate spinner on stderr.
pub struct SpinnerObserver {
    bar: ProgressBar,
}

impl SpinnerObserver {
    /// Spinner that stays hidden until a job is submitted.
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{elapsed}]") {
            bar.set_style(style);
        }
        Self { bar }
    }
}

impl Default for SpinnerObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl PollObserver for SpinnerObserver {
    fn on_submitted(&self, job_id: &str) {
        self.bar.set_message(format!("Generating your image... (job {})", job_id));
        self.bar.enable_steady_tick(Duration::from_millis(120));
    }

    fn on_poll(&self, attempt: u32, status: JobStatus) {
        self.bar
            .set_message(format!("Generating your image... {} (check {})", status, attempt));
    }

    fn on_finished(&self, _success: bool) {
        self.bar.finish_and_clear();
    }
}
