//! mart-core — enrollment-mart log normalizer.
//!
//! Parses the raw enrollment log into a star schema: three deduplicated
//! dimensions and one fact row per line, then writes them as CSV tables.
//!
//! # Pipeline
//!
//! ```text
//! raw line ──► LogRecord ──► Normalizer ──► StarSchema ──► <table>.csv
//!               (record)      (dimension)      (tables)
//! ```
//!
//! Everything here is synchronous and single-pass. The first line that fails
//! to parse aborts the pass before any table is written.

pub mod block;
pub mod config;
pub mod dimension;
pub mod error;
pub mod normalizer;
pub mod record;
pub mod tables;
pub mod types;

pub use dimension::Dimension;
pub use error::{Block, LineError, NormalizeError};
pub use normalizer::{normalize_path, NormalizeStats, Normalizer};
pub use record::{LogRecord, Pricing};
pub use tables::{StarSchema, Table, WrittenTable};
pub use types::{CourseDim, CourseId, FactEnrollment, TimeDim, UserDim, UserId};
