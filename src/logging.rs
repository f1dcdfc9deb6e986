//! Structured logging of [`Error`] values through `tracing`.
//!
//! The host decides where events go by installing a subscriber; this module
//! only shapes the event. Field names follow the scope keys consumers of the
//! failure envelope already index on: `title`, `status_code`, `error_type`,
//! `timestamp`, `details`, `metadata` and `traces`.

use std::error::Error as StdError;

use chrono::{DateTime, Utc};
use tracing::field;

use crate::types::Error;

/// `dd-MM-yyyy'T'HH:mm:ss.fff`
const LOG_TIMESTAMP_FORMAT: &str = "%d-%m-%YT%H:%M:%S%.3f";

/// Emits an `ERROR` event describing `error`.
pub fn log_error(error: &Error) {
    emit(error, None, None);
}

/// Emits the single `ERROR` event for a fault that reached the exception
/// boundary: the fields of [`log_error`] plus `fault` and the rendered
/// `problem` document.
pub fn log_unhandled(error: &Error, fault: &(dyn StdError + 'static), problem: &str) {
    emit(error, Some(fault), Some(problem));
}

fn emit(error: &Error, fault: Option<&(dyn StdError + 'static)>, problem: Option<&str>) {
    tracing::error!(
        title = %error.title(),
        status_code = error.status(),
        error_type = %error.error_type(),
        timestamp = %format_log_timestamp(error.timestamp()),
        details = %error.details().join("\n"),
        metadata = %join_metadata(error),
        traces = %error.traces().join("\n"),
        fault = fault.map(field::display),
        problem = problem,
        "{}",
        error.message()
    );
}

/// Formats `timestamp` in the day-first layout used by log events.
pub fn format_log_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format(LOG_TIMESTAMP_FORMAT).to_string()
}

/// Renders metadata as newline-separated `key='<json>'` entries.
pub fn join_metadata(error: &Error) -> String {
    error
        .metadata()
        .iter()
        .map(|(key, value)| format!("{key}='{value}'"))
        .collect::<Vec<_>>()
        .join("\n")
}
