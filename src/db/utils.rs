//! Database utility functions.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a timestamp the way every DATETIME column stores it.
///
/// Fixed-width RFC 3339 with microseconds, so string comparison in SQL
/// agrees with chronological order.
pub fn to_db_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Get the current time in storage format.
pub fn current_timestamp() -> String {
    to_db_timestamp(&Utc::now())
}
