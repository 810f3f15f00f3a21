//! Normalizer — folds parsed [`LogRecord`]s into three dimensions and a fact list.
//!
//! All state is owned by one [`Normalizer`] value for the duration of a pass;
//! [`Normalizer::finish`] hands it over as a [`StarSchema`]. Any line that fails
//! to parse aborts the pass with the line number and content attached.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::NaiveDateTime;

use crate::dimension::Dimension;
use crate::error::NormalizeError;
use crate::record::LogRecord;
use crate::tables::StarSchema;
use crate::types::{CourseDim, CourseId, FactEnrollment, TimeDim, UserDim, UserId};

/// Counters for one normalization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    /// Every line read, blank or not.
    pub lines_read: usize,
    pub blank_lines: usize,
    pub facts: usize,
    pub users: usize,
    pub courses: usize,
    pub times: usize,
}

/// Single-pass star-schema builder.
#[derive(Debug, Default)]
pub struct Normalizer {
    users: Dimension<UserId, UserDim>,
    courses: Dimension<CourseId, CourseDim>,
    times: Dimension<NaiveDateTime, TimeDim>,
    facts: Vec<FactEnrollment>,
    lines_read: usize,
    blank_lines: usize,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and commit one line. `line_no` is only used for error context.
    ///
    /// Returns `Ok(false)` for a blank (or whitespace-only) line, which is
    /// skipped without touching any table.
    pub fn ingest_line(&mut self, line_no: usize, line: &str) -> Result<bool, NormalizeError> {
        self.lines_read += 1;
        if line.trim().is_empty() {
            self.blank_lines += 1;
            return Ok(false);
        }

        let record = LogRecord::parse(line).map_err(|source| NormalizeError::Line {
            line_no,
            content: line.to_string(),
            source,
        })?;
        self.commit(record);
        Ok(true)
    }

    /// Consume a whole reader, numbering lines from 1.
    pub fn ingest_reader<R: BufRead>(&mut self, reader: R) -> Result<(), NormalizeError> {
        for (idx, line) in reader.lines().enumerate() {
            self.ingest_line(idx + 1, &line?)?;
        }
        tracing::debug!(stats = ?self.stats(), "normalization pass complete");
        Ok(())
    }

    /// Open `path` and consume it.
    pub fn ingest_path(&mut self, path: &Path) -> Result<(), NormalizeError> {
        let file = File::open(path).map_err(|source| NormalizeError::OpenInput {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "reading raw log");
        self.ingest_reader(BufReader::new(file))
    }

    pub fn stats(&self) -> NormalizeStats {
        NormalizeStats {
            lines_read: self.lines_read,
            blank_lines: self.blank_lines,
            facts: self.facts.len(),
            users: self.users.len(),
            courses: self.courses.len(),
            times: self.times.len(),
        }
    }

    pub fn users(&self) -> &Dimension<UserId, UserDim> {
        &self.users
    }

    pub fn courses(&self) -> &Dimension<CourseId, CourseDim> {
        &self.courses
    }

    pub fn times(&self) -> &Dimension<NaiveDateTime, TimeDim> {
        &self.times
    }

    pub fn facts(&self) -> &[FactEnrollment] {
        &self.facts
    }

    /// Hand over the accumulated tables in first-seen / append order.
    pub fn finish(self) -> StarSchema {
        StarSchema {
            users: self.users.into_values(),
            courses: self.courses.into_values(),
            times: self.times.into_values(),
            facts: self.facts,
        }
    }

    fn commit(&mut self, record: LogRecord) {
        let fact = record.fact();
        self.times.insert_if_absent(record.timestamp, record.time_dim());

        let user_id = record.user.user_id;
        if !self.users.insert_if_absent(user_id, record.user) {
            tracing::trace!(user_id, "user already seen, keeping first occurrence");
        }
        self.courses
            .insert_if_absent(record.course.course_id.clone(), record.course);
        self.facts.push(fact);
    }
}

/// Normalize the file at `path` in one pass.
pub fn normalize_path(path: &Path) -> Result<StarSchema, NormalizeError> {
    let mut normalizer = Normalizer::new();
    normalizer.ingest_path(path)?;
    Ok(normalizer.finish())
}
