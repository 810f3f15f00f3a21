//! Log record parsing — one raw line into typed dimension and fact parts.
//!
//! A line has the fixed shape
//!
//! ```text
//! 2024-01-15T10:00:00Z | web | user_id=1;user_name=Alice;user_city=NYC | course_id=C1;course_name=Rust;category=Programming | price=100;promo_code=NULL
//! ```
//!
//! The whole line is parsed before anything is handed to the
//! [`Normalizer`](crate::Normalizer), so a line that fails on its last block
//! never leaves a dimension row behind.

use chrono::{NaiveDateTime, Timelike};

use crate::block::KeyValueBlock;
use crate::error::{Block, LineError};
use crate::types::{CourseDim, FactEnrollment, TimeDim, UserDim};

/// Separator between the five top-level fields.
pub const FIELD_SEPARATOR: &str = " | ";

/// Strict timestamp format of the first field.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

const TIMESTAMP_LEN: usize = "YYYY-MM-DDTHH:MM:SSZ".len();

/// Price measures of one enrollment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pricing {
    pub price: i64,
    pub promo_code: Option<String>,
}

impl Pricing {
    /// `price` when no promo code applies, otherwise null.
    ///
    /// A promo code suppresses the final price instead of discounting it.
    pub fn final_price(&self) -> Option<i64> {
        match self.promo_code {
            None => Some(self.price),
            Some(_) => None,
        }
    }
}

/// One fully parsed log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub timestamp: NaiveDateTime,
    /// Second field of the line. Carried but not written to any table.
    pub reserved: String,
    pub user: UserDim,
    pub course: CourseDim,
    pub pricing: Pricing,
}

impl LogRecord {
    /// Parse a single non-blank line.
    pub fn parse(line: &str) -> Result<Self, LineError> {
        let fields: Vec<&str> = line.trim().split(FIELD_SEPARATOR).map(str::trim).collect();
        let [timestamp, reserved, user, course, price] = fields[..] else {
            return Err(LineError::MalformedLine {
                found: fields.len(),
            });
        };

        Ok(Self {
            timestamp: parse_timestamp(timestamp)?,
            reserved: reserved.to_string(),
            user: parse_user(user)?,
            course: parse_course(course)?,
            pricing: parse_pricing(price)?,
        })
    }

    pub fn time_dim(&self) -> TimeDim {
        TimeDim::from_timestamp(self.timestamp)
    }

    pub fn fact(&self) -> FactEnrollment {
        FactEnrollment {
            time_id: self.timestamp,
            user_id: self.user.user_id,
            course_id: self.course.course_id.clone(),
            price: self.pricing.price,
            promo_code: self.pricing.promo_code.clone(),
            final_price: self.pricing.final_price(),
        }
    }
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, LineError> {
    let invalid = || LineError::InvalidTimestamp {
        value: raw.to_string(),
    };
    // chrono tolerates some width variation in numeric fields
    if raw.len() != TIMESTAMP_LEN {
        return Err(invalid());
    }
    let ts = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|_| invalid())?;
    // chrono reads `:60` as a leap second
    if ts.nanosecond() >= 1_000_000_000 {
        return Err(invalid());
    }
    Ok(ts)
}

fn parse_user(raw: &str) -> Result<UserDim, LineError> {
    let block = KeyValueBlock::parse(Block::User, raw)?;
    let user_id = block.require("user_id")?;
    Ok(UserDim {
        user_id: user_id.parse().map_err(|_| LineError::InvalidId {
            key: "user_id",
            value: user_id.to_string(),
        })?,
        user_name: block.require("user_name")?.to_string(),
        user_city: block.require("user_city")?.to_string(),
    })
}

fn parse_course(raw: &str) -> Result<CourseDim, LineError> {
    let block = KeyValueBlock::parse(Block::Course, raw)?;
    Ok(CourseDim {
        course_id: block.require("course_id")?.to_string(),
        course_name: block.require("course_name")?.to_string(),
        category: block.require("category")?.to_string(),
    })
}

fn parse_pricing(raw: &str) -> Result<Pricing, LineError> {
    let block = KeyValueBlock::parse(Block::Price, raw)?;
    let price = block.require("price")?;
    Ok(Pricing {
        price: price.parse().map_err(|_| LineError::InvalidPrice {
            value: price.to_string(),
        })?,
        promo_code: block.require_nullable("promo_code")?.map(str::to_string),
    })
}
