//! Destination row types and the CSV records they are converted from.
//!
//! `dim_user` and `dim_course` load as read. `dim_time` and `fact_enrollment`
//! carry text timestamps in the CSV and are converted to ClickHouse's native
//! `DateTime` (seconds since epoch, `UInt32`) and `Date` (days since epoch,
//! `UInt16`) before insert.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use clickhouse::Row;
use mart_core::Table;
use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Accepted renderings of a `time_id` cell.
const TIME_ID_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// `dim_user` row.
///
/// ```sql
/// CREATE TABLE dim_user (
///     user_id Int64,
///     user_name String,
///     user_city String
/// ) ENGINE = MergeTree ORDER BY user_id;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Row, Serialize, Deserialize)]
pub struct DimUserRow {
    pub user_id: i64,
    pub user_name: String,
    pub user_city: String,
}

/// `dim_course` row.
///
/// ```sql
/// CREATE TABLE dim_course (
///     course_id String,
///     course_name String,
///     category String
/// ) ENGINE = MergeTree ORDER BY course_id;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Row, Serialize, Deserialize)]
pub struct DimCourseRow {
    pub course_id: String,
    pub course_name: String,
    pub category: String,
}

/// `dim_time` row.
///
/// ```sql
/// CREATE TABLE dim_time (
///     time_id DateTime,
///     date Date,
///     year UInt16,
///     month UInt8,
///     day UInt8,
///     hour UInt8
/// ) ENGINE = MergeTree ORDER BY time_id;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Row, Serialize)]
pub struct DimTimeRow {
    /// Seconds since the Unix epoch
    pub time_id: u32,
    /// Days since the Unix epoch
    pub date: u16,
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
}

/// `fact_enrollment` row.
///
/// ```sql
/// CREATE TABLE fact_enrollment (
///     time_id DateTime,
///     user_id Int64,
///     course_id String,
///     price Int64,
///     promo_code Nullable(String),
///     final_price Nullable(Int64)
/// ) ENGINE = MergeTree ORDER BY (time_id, user_id);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Row, Serialize)]
pub struct FactEnrollmentRow {
    /// Seconds since the Unix epoch
    pub time_id: u32,
    pub user_id: i64,
    pub course_id: String,
    pub price: i64,
    pub promo_code: Option<String>,
    pub final_price: Option<i64>,
}

/// `dim_time.csv` record as written by the normalizer.
#[derive(Debug, Deserialize)]
pub struct DimTimeRecord {
    pub time_id: String,
    pub date: String,
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
}

impl TryFrom<DimTimeRecord> for DimTimeRow {
    type Error = LoadError;

    fn try_from(record: DimTimeRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            time_id: to_datetime(&record.time_id)?,
            date: to_date(&record.date)?,
            year: record.year,
            month: record.month,
            day: record.day,
            hour: record.hour,
        })
    }
}

/// `fact_enrollment.csv` record as written by the normalizer. Empty
/// `promo_code` / `final_price` cells read as `None`.
#[derive(Debug, Deserialize)]
pub struct FactEnrollmentRecord {
    pub time_id: String,
    pub user_id: i64,
    pub course_id: String,
    pub price: i64,
    pub promo_code: Option<String>,
    pub final_price: Option<i64>,
}

impl TryFrom<FactEnrollmentRecord> for FactEnrollmentRow {
    type Error = LoadError;

    fn try_from(record: FactEnrollmentRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            time_id: to_datetime(&record.time_id)?,
            user_id: record.user_id,
            course_id: record.course_id,
            price: record.price,
            promo_code: record.promo_code,
            final_price: record.final_price,
        })
    }
}

/// Rows for one destination table, ready for a single batch insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBatch {
    Users(Vec<DimUserRow>),
    Courses(Vec<DimCourseRow>),
    Times(Vec<DimTimeRow>),
    Facts(Vec<FactEnrollmentRow>),
}

impl TableBatch {
    pub fn table(&self) -> Table {
        match self {
            TableBatch::Users(_) => Table::DimUser,
            TableBatch::Courses(_) => Table::DimCourse,
            TableBatch::Times(_) => Table::DimTime,
            TableBatch::Facts(_) => Table::FactEnrollment,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TableBatch::Users(rows) => rows.len(),
            TableBatch::Courses(rows) => rows.len(),
            TableBatch::Times(rows) => rows.len(),
            TableBatch::Facts(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Convert a `time_id` cell to a ClickHouse `DateTime`, reading it as UTC.
pub fn to_datetime(value: &str) -> Result<u32, LoadError> {
    let ts = TIME_ID_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| LoadError::InvalidTemporal {
            column: "time_id",
            value: value.to_string(),
            reason: "not an ISO-8601 date-time".into(),
        })?;
    u32::try_from(ts.and_utc().timestamp()).map_err(|_| LoadError::InvalidTemporal {
        column: "time_id",
        value: value.to_string(),
        reason: "outside the DateTime range 1970-01-01 to 2106-02-07".into(),
    })
}

/// Convert a `date` cell to a ClickHouse `Date`.
pub fn to_date(value: &str) -> Result<u16, LoadError> {
    let date = NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| {
        LoadError::InvalidTemporal {
            column: "date",
            value: value.to_string(),
            reason: e.to_string(),
        }
    })?;
    let days = date
        .signed_duration_since(DateTime::UNIX_EPOCH.date_naive())
        .num_days();
    u16::try_from(days).map_err(|_| LoadError::InvalidTemporal {
        column: "date",
        value: value.to_string(),
        reason: "outside the Date range 1970-01-01 to 2149-06-06".into(),
    })
}
