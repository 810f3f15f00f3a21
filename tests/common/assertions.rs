//! Domain-specific assertions for enrollment-mart harnesses.
//!
//! These wrap `pretty_assertions` and add context-rich failure messages that
//! say which table or which line broke.

use std::path::Path;

use mart_core::Table;

// ---------------------------------------------------------------------------
// Table files
// ---------------------------------------------------------------------------

/// Read a written table back as (header, rows) of raw string fields.
pub fn read_table(dir: &Path, table: Table) -> (Vec<String>, Vec<Vec<String>>) {
    let path = table.path_in(dir);
    let mut reader = csv::Reader::from_path(&path)
        .unwrap_or_else(|e| panic!("cannot open {}: {e}", path.display()));
    let header = reader
        .headers()
        .unwrap_or_else(|e| panic!("cannot read header of {}: {e}", path.display()))
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|r| {
            r.unwrap_or_else(|e| panic!("bad record in {}: {e}", path.display()))
                .iter()
                .map(str::to_string)
                .collect()
        })
        .collect();
    (header, rows)
}

/// Assert that no table file exists in `dir`.
pub fn assert_no_tables(dir: &Path) {
    for table in Table::ALL {
        let path = table.path_in(dir);
        assert!(
            !path.exists(),
            "assert_no_tables failed: {} was written",
            path.display()
        );
    }
}

/// Assert the row count of a written table.
///
/// ```rust
/// assert_table_rows!(dir, Table::DimUser, 2);
/// ```
#[macro_export]
macro_rules! assert_table_rows {
    ($dir:expr, $table:expr, $expected:expr) => {{
        let table: mart_core::Table = $table;
        let (_, rows) = $crate::common::read_table($dir, table);
        pretty_assertions::assert_eq!(
            rows.len(),
            $expected,
            "assert_table_rows! failed for {}",
            table
        );
    }};
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Assert a `NormalizeError` is a line failure at `line_no` whose cause
/// matches `pattern`.
///
/// ```rust
/// assert_line_error!(err, 2, LineError::MissingField { key: "category", .. });
/// ```
#[macro_export]
macro_rules! assert_line_error {
    ($err:expr, $line_no:expr, $pattern:pat) => {{
        match &$err {
            mart_core::NormalizeError::Line { line_no, source, .. } => {
                pretty_assertions::assert_eq!(*line_no, $line_no, "assert_line_error! wrong line");
                assert!(
                    matches!(source, $pattern),
                    "assert_line_error! failed:\n  expected: {}\n  actual:   {:?}",
                    stringify!($pattern),
                    source
                );
            }
            other => panic!("assert_line_error! failed: not a line error: {other:?}"),
        }
    }};
}
