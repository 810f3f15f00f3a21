//! Table loader — reads the normalizer's CSV tables and inserts them.
//!
//! Tables load sequentially in [`Table::ALL`] order over one inserter. Each
//! table's outcome is recorded on its own: an empty table is skipped, and a
//! failed read or insert does not stop the tables after it.

use std::fmt;
use std::path::{Path, PathBuf};

use mart_core::Table;
use serde::de::DeserializeOwned;

use crate::error::LoadError;
use crate::inserter::BatchInserter;
use crate::rows::{
    DimCourseRow, DimTimeRecord, DimTimeRow, DimUserRow, FactEnrollmentRecord, FactEnrollmentRow,
    TableBatch,
};

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// What happened to one table.
#[derive(Debug)]
pub enum TableOutcome {
    Loaded { rows: usize },
    Skipped,
    Failed(LoadError),
}

impl fmt::Display for TableOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableOutcome::Loaded { rows } => write!(f, "loaded {rows} rows"),
            TableOutcome::Skipped => write!(f, "empty, skipped"),
            TableOutcome::Failed(e) => write!(f, "failed: {e}"),
        }
    }
}

#[derive(Debug)]
pub struct TableReport {
    pub table: Table,
    pub outcome: TableOutcome,
}

/// Per-table outcomes of a run, in load order.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub tables: Vec<TableReport>,
}

impl LoadReport {
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    pub fn failures(&self) -> impl Iterator<Item = &TableReport> {
        self.tables
            .iter()
            .filter(|r| matches!(r.outcome, TableOutcome::Failed(_)))
    }

    pub fn loaded_rows(&self) -> usize {
        self.tables
            .iter()
            .map(|r| match r.outcome {
                TableOutcome::Loaded { rows } => rows,
                _ => 0,
            })
            .sum()
    }

    pub fn outcome(&self, table: Table) -> Option<&TableOutcome> {
        self.tables
            .iter()
            .find(|r| r.table == table)
            .map(|r| &r.outcome)
    }
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Loads the four tables found in one directory.
pub struct TableLoader<I> {
    inserter: I,
    input_dir: PathBuf,
}

impl<I: BatchInserter> TableLoader<I> {
    pub fn new(inserter: I, input_dir: impl Into<PathBuf>) -> Self {
        Self {
            inserter,
            input_dir: input_dir.into(),
        }
    }

    pub fn inserter(&self) -> &I {
        &self.inserter
    }

    /// Ping the destination, then load every table.
    ///
    /// Only a failed ping is returned as `Err`; per-table failures are in the
    /// report.
    pub async fn run(&self) -> Result<LoadReport, LoadError> {
        self.inserter.ping().await?;
        Ok(self.load_all().await)
    }

    pub async fn load_all(&self) -> LoadReport {
        let mut report = LoadReport::default();
        for table in Table::ALL {
            let outcome = self.load_table(table).await;
            match &outcome {
                TableOutcome::Loaded { rows } => tracing::info!(table = %table, rows, "table loaded"),
                TableOutcome::Skipped => tracing::info!(table = %table, "table empty, skipped"),
                TableOutcome::Failed(e) => tracing::error!(table = %table, error = %e, "table load failed"),
            }
            report.tables.push(TableReport { table, outcome });
        }
        report
    }

    pub async fn load_table(&self, table: Table) -> TableOutcome {
        let path = table.path_in(&self.input_dir);
        let batch = match read_batch(table, &path) {
            Ok(batch) => batch,
            Err(e) => return TableOutcome::Failed(e),
        };
        if batch.is_empty() {
            return TableOutcome::Skipped;
        }

        tracing::debug!(table = %table, rows = batch.len(), path = %path.display(), "inserting batch");
        match self.inserter.insert(&batch).await {
            Ok(()) => TableOutcome::Loaded { rows: batch.len() },
            Err(e) => TableOutcome::Failed(e),
        }
    }
}

/// Read `path` as the CSV file of `table`, converting temporal columns.
pub fn read_batch(table: Table, path: &Path) -> Result<TableBatch, LoadError> {
    Ok(match table {
        Table::DimUser => TableBatch::Users(read_records::<DimUserRow>(path)?),
        Table::DimCourse => TableBatch::Courses(read_records::<DimCourseRow>(path)?),
        Table::DimTime => TableBatch::Times(
            read_records::<DimTimeRecord>(path)?
                .into_iter()
                .map(DimTimeRow::try_from)
                .collect::<Result<_, _>>()?,
        ),
        Table::FactEnrollment => TableBatch::Facts(
            read_records::<FactEnrollmentRecord>(path)?
                .into_iter()
                .map(FactEnrollmentRow::try_from)
                .collect::<Result<_, _>>()?,
        ),
    })
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LoadError> {
    let read_err = |source| LoadError::ReadTable {
        path: path.to_path_buf(),
        source,
    };
    csv::Reader::from_path(path)
        .map_err(read_err)?
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(read_err)
}

/// Load the tables in `dir` through `inserter`.
pub async fn load_tables<I: BatchInserter>(inserter: I, dir: &Path) -> Result<LoadReport, LoadError> {
    TableLoader::new(inserter, dir).run().await
}
