//! Remote image-generation jobs.
//!
//! A prompt is submitted to an asynchronous job queue, its status endpoint is
//! polled at a fixed interval, and the data-URL image of a completed job is
//! decoded. The image only exists once the job reports `COMPLETED`.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod data_url;
mod dto;
mod generator;
mod observer;
mod transport;

pub use data_url::decode_data_url;
pub use dto::{
    JobInput, JobOutput, JobRequest, JobStatus, NEGATIVE_PROMPT, StatusResponse, SubmitResponse,
};
pub use generator::ImageGenerator;
pub use observer::{NoopObserver, PollObserver};
pub use transport::{HttpJobTransport, JobTransport};
