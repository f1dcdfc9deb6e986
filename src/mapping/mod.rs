//! Conversions between raised faults, [`Error`] values and problem documents.
//!
//! - [`build_error_from_fault`] / [`build_error_from_std`] classify a raised
//!   failure into an [`Error`].
//! - [`build_problem_document`] renders an [`Error`] plus request context into
//!   the transport envelope; [`parse_problem_document`] is its lossy inverse.
//! - [`get_messages`] / [`get_traces`] walk a `source()` chain.
//!
//! # Examples
//!
//! ```
//! use problem_rail::mapping::{build_error_from_fault, build_problem_document, RequestInfo};
//! use problem_rail::Fault;
//!
//! let fault = Fault::bad_request("msg", "TypeX", "TitleX")?;
//! let error = build_error_from_fault(&fault);
//! let doc = build_problem_document(&RequestInfo::new("GET", "/x"), &error);
//!
//! assert_eq!(doc.status, Some(400));
//! assert_eq!(doc.instance.as_deref(), Some("GET /x"));
//! assert_eq!(doc.detail.as_deref(), Some("msg"));
//! # Ok::<(), problem_rail::RailError>(())
//! ```

use std::backtrace::BacktraceStatus;
use std::error::Error as StdError;

use crate::error::is_blank;
use crate::fault::{Fault, FaultKind};
use crate::types::Error;

pub mod problem;
pub mod request;

pub use problem::{
    build_problem_document, build_validation_problem_document, parse_problem_document,
    FieldErrors, ProblemDocument, ValidationProblemDocument, APPLICATION_PROBLEM_JSON,
};
pub use request::{
    version_from_content_type, CurrentRequest, CurrentRequestGuard, RequestContext,
    RequestContextAccessor, RequestInfo, TraceIdentifier, CORRELATION_ID_HEADER,
    REQUEST_ID_HEADER,
};

const UNHANDLED_MESSAGE: &str = "An unhandled error occurred.";

/// Classifies a fault by its kind. The error's message is the fault's message.
pub fn build_error_from_fault(fault: &Fault) -> Error {
    let error = Error::unchecked(fault.message().to_owned());

    match fault.kind() {
        FaultKind::BadRequest(c) => {
            error.classify(c.error_type.clone(), c.error_title.clone(), 400)
        },
        FaultKind::Unauthorized => error.as_unauthorized(),
        FaultKind::Forbidden => error.as_forbidden(),
        FaultKind::NotFound => error.as_not_found(),
        FaultKind::InternalServer(Some(c))
            if !is_blank(&c.error_type) && !is_blank(&c.error_title) =>
        {
            error.classify(c.error_type.clone(), c.error_title.clone(), 500)
        },
        FaultKind::InternalServer(_) => error,
    }
}

/// Classifies any error: faults by kind, [`Error`] values as-is, anything
/// else as an unclassified internal server error.
pub fn build_error_from_std(err: &(dyn StdError + 'static)) -> Error {
    if let Some(fault) = err.downcast_ref::<Fault>() {
        return build_error_from_fault(fault);
    }
    if let Some(error) = err.downcast_ref::<Error>() {
        return error.clone();
    }

    let message = err.to_string();
    if is_blank(&message) {
        return Error::unchecked(UNHANDLED_MESSAGE.to_owned());
    }
    Error::unchecked(message)
}

/// Collects the display text of `err` and up to `depth - 1` of its sources,
/// keeping the first occurrence of each message.
pub fn get_messages(err: &(dyn StdError + 'static), depth: usize) -> Vec<String> {
    let mut messages = Vec::new();
    let mut current = Some(err);
    let mut level = 0;

    while let Some(e) = current {
        if level >= depth {
            break;
        }
        messages.push(e.to_string());
        current = e.source();
        level += 1;
    }

    dedup_in_order(messages)
}

/// Collects origin lines (source locations) from `err` and up to `depth - 1`
/// of its sources. The walk stops at the first level without origin lines.
pub fn get_traces(err: &(dyn StdError + 'static), depth: usize) -> Vec<String> {
    let mut traces = Vec::new();
    let mut current = Some(err);
    let mut level = 0;

    while let Some(e) = current {
        if level >= depth {
            break;
        }
        let lines = level_origin_lines(e);
        if lines.is_empty() {
            break;
        }
        traces.extend(lines);
        current = e.source();
        level += 1;
    }

    dedup_in_order(traces)
}

fn level_origin_lines(err: &(dyn StdError + 'static)) -> Vec<String> {
    let Some(fault) = err.downcast_ref::<Fault>() else {
        return Vec::new();
    };

    let location = fault.location();
    let mut lines = vec![format!("{}:{}:{}", location.file(), location.line(), location.column())];
    if fault.backtrace().status() == BacktraceStatus::Captured {
        lines.extend(origin_lines(&fault.backtrace().to_string()));
    }
    lines
}

/// Extracts the source locations from a rendered backtrace: the text after
/// `at ` on each location line. Frames inside the standard library are skipped.
pub fn origin_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .filter_map(|line| line.trim_start().strip_prefix("at "))
        .map(str::trim)
        .filter(|location| !location.is_empty() && !location.starts_with("/rustc/"))
        .map(str::to_owned)
        .collect()
}

fn dedup_in_order(items: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}
