//! Core types for mart-core — the star-schema rows.
//!
//! This module defines the three dimension rows ([`UserDim`], [`CourseDim`],
//! [`TimeDim`]) and the [`FactEnrollment`] row. Field order on every struct is
//! the column order of the corresponding CSV table, and the serde attributes
//! fix how temporal columns are rendered.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;

/// Integer user key shared by `dim_user` and `fact_enrollment`.
pub type UserId = i64;

/// String course key shared by `dim_course` and `fact_enrollment`.
pub type CourseId = String;

/// Render format for `dim_time.time_id`.
pub const TIME_ID_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Render format for `dim_time.date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Render format for `fact_enrollment.time_id`.
pub const FACT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A row of `dim_user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDim {
    pub user_id: UserId,
    pub user_name: String,
    pub user_city: String,
}

/// A row of `dim_course`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseDim {
    pub course_id: CourseId,
    pub course_name: String,
    pub category: String,
}

/// A row of `dim_time`, one per distinct second-precision timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeDim {
    #[serde(serialize_with = "render::time_id")]
    pub time_id: NaiveDateTime,
    #[serde(serialize_with = "render::date")]
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
}

impl TimeDim {
    /// Derive the calendar attributes of a timestamp.
    pub fn from_timestamp(ts: NaiveDateTime) -> Self {
        Self {
            time_id: ts,
            date: ts.date(),
            year: ts.year(),
            month: ts.month(),
            day: ts.day(),
            hour: ts.hour(),
        }
    }
}

/// A row of `fact_enrollment`. One per log line, never deduplicated.
///
/// `promo_code` and `final_price` are the only nullable columns; a `None`
/// renders as an empty CSV field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactEnrollment {
    #[serde(serialize_with = "render::fact_time")]
    pub time_id: NaiveDateTime,
    pub user_id: UserId,
    pub course_id: CourseId,
    pub price: i64,
    pub promo_code: Option<String>,
    pub final_price: Option<i64>,
}

mod render {
    use chrono::{NaiveDate, NaiveDateTime};
    use serde::Serializer;

    pub fn time_id<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&ts.format(super::TIME_ID_FORMAT))
    }

    pub fn date<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&date.format(super::DATE_FORMAT))
    }

    pub fn fact_time<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&ts.format(super::FACT_TIME_FORMAT))
    }
}
