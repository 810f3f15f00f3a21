//! Table loader errors

use std::path::PathBuf;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors from the table loader
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The destination could not be reached; nothing was loaded
    #[error("failed to connect to {url}: {source}")]
    Connection {
        url: String,
        #[source]
        source: BoxError,
    },

    /// A table file is missing or does not match its row type
    #[error("failed to read {}: {source}", .path.display())]
    ReadTable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A `time_id` or `date` value could not be converted
    #[error("invalid {column} value {value:?}: {reason}")]
    InvalidTemporal {
        column: &'static str,
        value: String,
        reason: String,
    },

    /// The batch insert into one table failed
    #[error("insert into {table} failed: {source}")]
    Insert {
        table: String,
        #[source]
        source: BoxError,
    },
}
