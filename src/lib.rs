//! enrollment-mart — course-enrollment log ETL.
//!
//! Two steps, run in order by the `mart-etl` binary:
//!
//! ```text
//! raw log ──► transform (mart-core) ──► <table>.csv ──► load (mart-loader) ──► ClickHouse
//! ```
//!
//! Each step writes human-readable status lines to a caller-supplied writer
//! and returns a typed error on failure. [`run_pipeline`] never starts the load
//! step when the transform step failed.

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub use mart_core;
pub use mart_loader;

use mart_core::{NormalizeError, NormalizeStats, Normalizer, WrittenTable};
use mart_loader::{BatchInserter, LoadError, LoadReport, TableLoader, TableOutcome};

/// Where the raw log is read from. `-` means stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Path(PathBuf),
    Stdin,
}

impl From<PathBuf> for InputSource {
    fn from(path: PathBuf) -> Self {
        if path.as_os_str() == "-" {
            InputSource::Stdin
        } else {
            InputSource::Path(path)
        }
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Path(path) => write!(f, "{}", path.display()),
            InputSource::Stdin => write!(f, "<stdin>"),
        }
    }
}

/// Errors that stop the pipeline
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The log did not normalize or the tables could not be written
    #[error("transform failed: {0}")]
    Transform(#[from] NormalizeError),

    /// The destination was unreachable
    #[error("load failed: {0}")]
    LoadConnection(#[from] LoadError),

    /// At least one table failed to load
    #[error("load failed for {failed} of {total} tables")]
    TablesFailed { failed: usize, total: usize },

    /// A status line could not be written
    #[error("failed to write status output: {0}")]
    Status(#[from] io::Error),
}

/// Result of a successful transform step.
#[derive(Debug)]
pub struct TransformSummary {
    pub stats: NormalizeStats,
    pub written: Vec<WrittenTable>,
}

/// Normalize `input` and write the four tables into `output_dir`.
pub fn transform(input: &InputSource, output_dir: &Path) -> Result<TransformSummary, NormalizeError> {
    let mut normalizer = Normalizer::new();
    match input {
        InputSource::Path(path) => normalizer.ingest_path(path)?,
        InputSource::Stdin => normalizer.ingest_reader(io::stdin().lock())?,
    }
    let stats = normalizer.stats();
    let written = normalizer.finish().write_tables(output_dir)?;
    tracing::info!(
        input = %input,
        lines = stats.lines_read,
        facts = stats.facts,
        users = stats.users,
        courses = stats.courses,
        times = stats.times,
        "transform complete"
    );
    Ok(TransformSummary { stats, written })
}

/// Transform step with status output.
pub fn transform_step<W: Write>(
    out: &mut W,
    input: &InputSource,
    output_dir: &Path,
) -> Result<TransformSummary, PipelineError> {
    writeln!(out, "[transform] Normalizing {input} into dimension and fact tables...")?;
    match transform(input, output_dir) {
        Ok(summary) => {
            for table in &summary.written {
                writeln!(out, "  {:<16} {:>6} rows  {}", table.table, table.rows, table.path.display())?;
            }
            writeln!(
                out,
                "[transform] Done: {} facts from {} lines ({} blank skipped)",
                summary.stats.facts, summary.stats.lines_read, summary.stats.blank_lines
            )?;
            Ok(summary)
        }
        Err(e) => {
            writeln!(out, "[transform] FAILED: {e}")?;
            Err(e.into())
        }
    }
}

/// Load step with status output: ping, then one line per table.
pub async fn load_step<W: Write, I: BatchInserter>(
    out: &mut W,
    inserter: I,
    input_dir: &Path,
) -> Result<LoadReport, PipelineError> {
    writeln!(out, "[load] Loading tables from {}...", input_dir.display())?;
    let loader = TableLoader::new(inserter, input_dir);
    let report = match loader.run().await {
        Ok(report) => report,
        Err(e) => {
            writeln!(out, "[load] FAILED: {e}")?;
            return Err(e.into());
        }
    };

    for entry in &report.tables {
        let marker = match entry.outcome {
            TableOutcome::Failed(_) => "FAILED",
            _ => "ok",
        };
        writeln!(out, "  {:<16} {:<6} {}", entry.table, marker, entry.outcome)?;
    }

    let failed = report.failures().count();
    if failed > 0 {
        writeln!(out, "[load] FAILED: {failed} of {} tables did not load", report.tables.len())?;
        return Err(PipelineError::TablesFailed {
            failed,
            total: report.tables.len(),
        });
    }
    writeln!(out, "[load] Done: {} rows loaded", report.loaded_rows())?;
    Ok(report)
}

/// Transform, then load. The inserter is never touched if the transform fails.
pub async fn run_pipeline<W: Write, I: BatchInserter>(
    out: &mut W,
    input: &InputSource,
    processed_dir: &Path,
    inserter: I,
) -> Result<(TransformSummary, LoadReport), PipelineError> {
    let summary = transform_step(out, input, processed_dir)?;
    let report = load_step(out, inserter, processed_dir).await?;
    Ok((summary, report))
}
