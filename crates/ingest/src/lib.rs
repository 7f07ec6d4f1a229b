//! Content ingestion: recognized exam text in, Question rows out
//!
//! An independent asynchronous producer. The progression core never calls
//! into this crate; it only ever sees the finished Question rows that the
//! worker writes through the storage layer.

pub mod extract;
pub mod jobs;

pub use extract::{extract_questions, ExtractedQuestion, Extraction};
pub use jobs::{IngestError, IngestResult, Ingester, JobState, JobStatus};
