//! Normalizer errors

use std::fmt;
use std::path::PathBuf;

/// Which key-value block of a log line an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    User,
    Course,
    Price,
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Block::User => write!(f, "user"),
            Block::Course => write!(f, "course"),
            Block::Price => write!(f, "price"),
        }
    }
}

/// Why a single log line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineError {
    /// The line did not split into exactly five `" | "` fields
    #[error("expected 5 ' | '-separated fields, found {found}")]
    MalformedLine { found: usize },

    /// The leading field is not `YYYY-MM-DDTHH:MM:SSZ`
    #[error("invalid timestamp {value:?}, expected YYYY-MM-DDTHH:MM:SSZ")]
    InvalidTimestamp { value: String },

    /// A sub-field lacks exactly one `=`
    #[error("malformed key=value pair {pair:?} in {block} block")]
    MalformedKeyValue { block: Block, pair: String },

    /// An id column is not an integer
    #[error("invalid {key} {value:?}, expected an integer")]
    InvalidId { key: &'static str, value: String },

    /// The price is not an integer
    #[error("invalid price {value:?}, expected an integer")]
    InvalidPrice { value: String },

    /// A required key is absent from its block
    #[error("{block} block is missing required key {key:?}")]
    MissingField { block: Block, key: &'static str },
}

/// Errors from a normalization run
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    /// A line failed to parse; the run is aborted
    #[error("line {line_no}: {source} (content: {content:?})")]
    Line {
        line_no: usize,
        content: String,
        #[source]
        source: LineError,
    },

    /// The input file could not be opened
    #[error("failed to open input {}: {source}", .path.display())]
    OpenInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading from the input failed mid-stream (including invalid UTF-8)
    #[error("failed to read input: {0}")]
    Read(#[from] std::io::Error),

    /// A table file or the output directory could not be written
    #[error("failed to write {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl NormalizeError {
    /// The underlying line error, if this is a parse failure.
    pub fn line_error(&self) -> Option<&LineError> {
        match self {
            NormalizeError::Line { source, .. } => Some(source),
            _ => None,
        }
    }
}
