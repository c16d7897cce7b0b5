//! Candidate intake — turns a batch of profile identifiers into accepted
//! candidates for a claimed job.
//!
//! Flow: build `SubmissionBatch` (manual list or CSV upload) → validate →
//! scrape → score (with fallback) → threshold → persist → `BatchResult`.

use thiserror::Error;

use crate::jobs::JobError;
use crate::store::StoreError;

pub mod batch;
pub mod csv_parser;
pub mod handlers;
pub mod pipeline;

/// Hard cap on identifiers per submission.
pub const MAX_BATCH_SIZE: usize = 50;
/// Hard cap on an uploaded file, checked before parsing.
pub const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("batch contains no profile identifiers")]
    EmptyBatch,

    #[error("batch has {size} identifiers; the maximum is {max}")]
    BatchTooLarge { size: usize, max: usize },

    #[error("not recognized as profile URLs: {}", .0.join(", "))]
    InvalidIdentifier(Vec<String>),

    #[error("could not parse uploaded file: {0}")]
    MalformedFile(String),

    #[error("uploaded file exceeds the maximum of {max} bytes")]
    FileTooLarge { max: usize },

    #[error(transparent)]
    Job(#[from] JobError),

    #[error("failed to persist candidate: {0}")]
    Persistence(#[from] StoreError),
}
