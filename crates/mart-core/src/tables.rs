//! Table output — the four star-schema tables as CSV files.
//!
//! Each table is written to `<name>.csv.tmp` next to its destination and then
//! renamed over `<name>.csv`, so a reader never sees a half-written table.
//! Tables are written in [`Table::ALL`] order; if a later table fails, the
//! earlier ones have already been replaced.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::NormalizeError;
use crate::types::{CourseDim, FactEnrollment, TimeDim, UserDim};

/// The four output tables, also the destination table names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    DimUser,
    DimCourse,
    DimTime,
    FactEnrollment,
}

impl Table {
    /// Write and load order.
    pub const ALL: [Table; 4] = [
        Table::DimUser,
        Table::DimCourse,
        Table::DimTime,
        Table::FactEnrollment,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Table::DimUser => "dim_user",
            Table::DimCourse => "dim_course",
            Table::DimTime => "dim_time",
            Table::FactEnrollment => "fact_enrollment",
        }
    }

    /// Header row, in the field order of the row type.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Table::DimUser => &["user_id", "user_name", "user_city"],
            Table::DimCourse => &["course_id", "course_name", "category"],
            Table::DimTime => &["time_id", "date", "year", "month", "day", "hour"],
            Table::FactEnrollment => &[
                "time_id",
                "user_id",
                "course_id",
                "price",
                "promo_code",
                "final_price",
            ],
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.csv", self.name())
    }

    pub fn path_in(self, dir: &Path) -> PathBuf {
        dir.join(self.file_name())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// A file produced by [`StarSchema::write_tables`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenTable {
    pub table: Table,
    pub path: PathBuf,
    pub rows: usize,
}

/// The normalized output of one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StarSchema {
    pub users: Vec<UserDim>,
    pub courses: Vec<CourseDim>,
    pub times: Vec<TimeDim>,
    pub facts: Vec<FactEnrollment>,
}

impl StarSchema {
    pub fn row_count(&self, table: Table) -> usize {
        match table {
            Table::DimUser => self.users.len(),
            Table::DimCourse => self.courses.len(),
            Table::DimTime => self.times.len(),
            Table::FactEnrollment => self.facts.len(),
        }
    }

    /// Render one table as CSV into `writer`.
    pub fn write_table_to<W: Write>(&self, table: Table, writer: W) -> csv::Result<()> {
        match table {
            Table::DimUser => write_rows(writer, table.columns(), &self.users),
            Table::DimCourse => write_rows(writer, table.columns(), &self.courses),
            Table::DimTime => write_rows(writer, table.columns(), &self.times),
            Table::FactEnrollment => write_rows(writer, table.columns(), &self.facts),
        }
    }

    /// Write all four tables into `dir`, creating it if needed and
    /// overwriting existing files.
    pub fn write_tables(&self, dir: &Path) -> Result<Vec<WrittenTable>, NormalizeError> {
        fs::create_dir_all(dir).map_err(|source| NormalizeError::OutputWrite {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut written = Vec::with_capacity(Table::ALL.len());
        for table in Table::ALL {
            let path = table.path_in(dir);
            self.replace_file(table, &path)
                .map_err(|source| NormalizeError::OutputWrite {
                    path: path.clone(),
                    source,
                })?;
            let rows = self.row_count(table);
            tracing::debug!(table = %table, rows, path = %path.display(), "wrote table");
            written.push(WrittenTable { table, path, rows });
        }
        Ok(written)
    }

    fn replace_file(&self, table: Table, path: &Path) -> std::io::Result<()> {
        let tmp = path.with_extension("csv.tmp");
        let result = fs::File::create(&tmp)
            .and_then(|file| self.write_table_to(table, file).map_err(Into::into))
            .and_then(|()| fs::rename(&tmp, path));
        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result
    }
}

/// Header first, even for an empty table, then one record per row.
fn write_rows<W: Write, T: Serialize>(writer: W, columns: &[&str], rows: &[T]) -> csv::Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(columns)?;
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}
