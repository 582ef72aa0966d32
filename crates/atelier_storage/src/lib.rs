//! Generation log for Atelier.
//!
//! Every successful generation can be appended to a CSV file with the columns
//! `timestamp, group_members, prompt, image`, the image being a base64 PNG.
//! Writers are serialised, so concurrent workflows never interleave rows.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod log;
mod record;

pub use log::GenerationLog;
pub use record::{GenerationLogRecord, TIMESTAMP_FORMAT};
