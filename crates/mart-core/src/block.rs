//! `key=value;key=value` blocks — the user, course, and price fields of a log line.

use std::collections::HashMap;

use crate::error::{Block, LineError};

/// Literal the log writes for an absent value.
pub const NULL_SENTINEL: &str = "NULL";

/// A parsed key-value block, borrowing from the source line.
///
/// A repeated key keeps its last value. Keys and values are taken verbatim;
/// only the enclosing field is trimmed by the caller.
#[derive(Debug, Clone)]
pub struct KeyValueBlock<'a> {
    kind: Block,
    pairs: HashMap<&'a str, &'a str>,
}

impl<'a> KeyValueBlock<'a> {
    /// Parse a `;`-separated block. Every sub-field must contain exactly one `=`.
    pub fn parse(kind: Block, raw: &'a str) -> Result<Self, LineError> {
        let mut pairs = HashMap::new();
        for pair in raw.split(';') {
            match pair.split_once('=') {
                Some((key, value)) if !value.contains('=') => {
                    pairs.insert(key, value);
                }
                _ => {
                    return Err(LineError::MalformedKeyValue {
                        block: kind,
                        pair: pair.to_string(),
                    })
                }
            }
        }
        Ok(Self { kind, pairs })
    }

    /// Value of a required key.
    pub fn require(&self, key: &'static str) -> Result<&'a str, LineError> {
        self.pairs
            .get(key)
            .copied()
            .ok_or(LineError::MissingField {
                block: self.kind,
                key,
            })
    }

    /// Value of a required key that may be absent: the `NULL` sentinel or a
    /// blank value both read as `None`.
    pub fn require_nullable(&self, key: &'static str) -> Result<Option<&'a str>, LineError> {
        self.require(key)
            .map(|value| (value != NULL_SENTINEL && !value.trim().is_empty()).then_some(value))
    }
}
