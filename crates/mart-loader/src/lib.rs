//! mart-loader — bulk-loads the enrollment-mart CSV tables into ClickHouse.
//!
//! The loader reads each table produced by `mart-core`, converts temporal
//! columns to ClickHouse's native types, and inserts every table in a single
//! batch. Per-table failures are reported, not propagated.

pub mod error;
pub mod inserter;
pub mod loader;
pub mod rows;

pub use error::LoadError;
pub use inserter::{BatchInserter, ClickHouseInserter};
pub use loader::{load_tables, read_batch, LoadReport, TableLoader, TableOutcome, TableReport};
pub use rows::{DimCourseRow, DimTimeRow, DimUserRow, FactEnrollmentRow, TableBatch};
