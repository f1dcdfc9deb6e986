//! The canonical failure value.
//!
//! [`Error`] describes one failure occurrence: a message, an HTTP-style
//! classification (`error_type`, `title`, `status`), a timestamp, free-form
//! metadata, and deduplicated lists of contributing details and origin traces.
//!
//! Classification changes only through the `as_*` methods; `with_*` methods
//! accumulate context without reclassifying.
//!
//! # Examples
//!
//! ```
//! use problem_rail::Error;
//!
//! let err = Error::new("account 42 is closed")?
//!     .as_bad_request("AccountClosedError", "Operation on a closed account.")?
//!     .with_details("closed on 2024-01-01")
//!     .with_metadata("account_id", 42)?;
//!
//! assert_eq!(err.status(), 400);
//! assert_eq!(err.error_type(), "AccountClosedError");
//! assert!(err.has_metadata_key("account_id")?);
//! # Ok::<(), problem_rail::RailError>(())
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::error::{is_blank, require_non_blank, RailError, RailResult};
use crate::mapping::{get_messages, get_traces};
use crate::types::ErrorVec;

pub const INTERNAL_SERVER_ERROR_TYPE: &str = "InternalServerError";
pub const INTERNAL_SERVER_ERROR_TITLE: &str = "An internal server error occurred.";
pub const UNAUTHORIZED_ERROR_TYPE: &str = "UnauthorizedError";
pub const UNAUTHORIZED_ERROR_TITLE: &str = "An authorization error occurred.";
pub const FORBIDDEN_ERROR_TYPE: &str = "ForbiddenError";
pub const FORBIDDEN_ERROR_TITLE: &str = "Access to the resource is forbidden.";
pub const NOT_FOUND_ERROR_TYPE: &str = "NotFoundError";
pub const NOT_FOUND_ERROR_TITLE: &str = "No data was found at the requested route.";

/// A classified failure.
///
/// Equality and hashing ignore `timestamp` and `traces`: two errors raised
/// for the same reason at different times compare equal.
#[must_use]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    pub(crate) message: String,
    #[serde(rename = "type")]
    pub(crate) error_type: String,
    pub(crate) title: String,
    pub(crate) status: u16,
    pub(crate) timestamp: DateTime<Utc>,
    pub(crate) metadata: BTreeMap<String, Value>,
    pub(crate) details: ErrorVec<String>,
    pub(crate) traces: ErrorVec<String>,
}

impl Error {
    /// The "no error" sentinel carried by successful outcomes.
    pub const NONE: Error = Error {
        message: String::new(),
        error_type: String::new(),
        title: String::new(),
        status: 0,
        timestamp: DateTime::<Utc>::MIN_UTC,
        metadata: BTreeMap::new(),
        details: ErrorVec::new_const(),
        traces: ErrorVec::new_const(),
    };

    /// Creates an error classified as a generic internal server error (500).
    ///
    /// Fails with [`RailError::BlankArgument`] when `message` is blank.
    pub fn new(message: impl Into<String>) -> RailResult<Self> {
        let message = message.into();
        require_non_blank(&message, "message")?;
        Ok(Self::unchecked(message))
    }

    /// Builds a default-classified error from a message known to be non-blank.
    pub(crate) fn unchecked(message: String) -> Self {
        Self {
            message,
            error_type: INTERNAL_SERVER_ERROR_TYPE.into(),
            title: INTERNAL_SERVER_ERROR_TITLE.into(),
            status: 500,
            timestamp: Utc::now(),
            metadata: BTreeMap::new(),
            details: ErrorVec::new(),
            traces: ErrorVec::new(),
        }
    }

    /// Returns `true` for the [`Error::NONE`] sentinel.
    #[inline]
    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// What went wrong, as supplied at construction.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Machine-readable classification, e.g. `NotFoundError`.
    #[inline]
    pub fn error_type(&self) -> &str {
        &self.error_type
    }

    /// Human-readable summary of the classification.
    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// HTTP-style status class (`0` only for [`Error::NONE`]).
    #[inline]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The status as an [`http::StatusCode`], if it is a valid one.
    #[inline]
    pub fn status_code(&self) -> Option<http::StatusCode> {
        http::StatusCode::from_u16(self.status).ok()
    }

    /// Returns `true` for 4xx classifications.
    #[inline]
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// When the error was created, unless replaced with [`with_timestamp`](Self::with_timestamp).
    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Free-form context, ordered by key.
    #[inline]
    pub fn metadata(&self) -> &BTreeMap<String, Value> {
        &self.metadata
    }

    /// Contributing messages, in the order they were first seen.
    #[inline]
    pub fn details(&self) -> &[String] {
        &self.details
    }

    /// Origin locations collected from causes, in the order they were first seen.
    #[inline]
    pub fn traces(&self) -> &[String] {
        &self.traces
    }

    /// Classifies the error as a bad request (400).
    ///
    /// Both `error_type` and `title` are required.
    pub fn as_bad_request(
        mut self,
        error_type: impl Into<String>,
        title: impl Into<String>,
    ) -> RailResult<Self> {
        let (error_type, title) = (error_type.into(), title.into());
        require_non_blank(&error_type, "error_type")?;
        require_non_blank(&title, "title")?;

        self.error_type = error_type;
        self.title = title;
        self.status = 400;
        Ok(self)
    }

    /// Classifies the error as unauthorized (401) with the fixed type and title.
    pub fn as_unauthorized(mut self) -> Self {
        self.error_type = UNAUTHORIZED_ERROR_TYPE.into();
        self.title = UNAUTHORIZED_ERROR_TITLE.into();
        self.status = 401;
        self
    }

    /// Classifies the error as forbidden (403) with the fixed type and title.
    pub fn as_forbidden(mut self) -> Self {
        self.error_type = FORBIDDEN_ERROR_TYPE.into();
        self.title = FORBIDDEN_ERROR_TITLE.into();
        self.status = 403;
        self
    }

    /// Classifies the error as not found (404) with the fixed type and title.
    pub fn as_not_found(mut self) -> Self {
        self.error_type = NOT_FOUND_ERROR_TYPE.into();
        self.title = NOT_FOUND_ERROR_TITLE.into();
        self.status = 404;
        self
    }

    /// Classifies the error as an internal server error (500).
    ///
    /// Unlike [`as_bad_request`](Self::as_bad_request), only one of
    /// `error_type` / `title` is required; the call fails when both are blank.
    pub fn as_internal_server(
        mut self,
        error_type: impl Into<String>,
        title: impl Into<String>,
    ) -> RailResult<Self> {
        let (error_type, title) = (error_type.into(), title.into());
        if is_blank(&error_type) && is_blank(&title) {
            return Err(RailError::MissingClassification { kind: "internal server error" });
        }

        self.error_type = error_type;
        self.title = title;
        self.status = 500;
        Ok(self)
    }

    /// Applies an already validated classification.
    pub(crate) fn classify(mut self, error_type: String, title: String, status: u16) -> Self {
        self.error_type = error_type;
        self.title = title;
        self.status = status;
        self
    }

    /// Appends a detail unless it is blank, already present, or equal to the message.
    pub fn with_details(mut self, details: impl AsRef<str>) -> Self {
        self.push_detail(details.as_ref());
        self
    }

    fn push_detail(&mut self, details: &str) {
        if !is_blank(details)
            && details != self.message
            && !self.details.iter().any(|d| d == details)
        {
            self.details.push(details.to_owned());
        }
    }

    fn push_trace(&mut self, trace: &str) {
        if !is_blank(trace) && !self.traces.iter().any(|t| t == trace) {
            self.traces.push(trace.to_owned());
        }
    }

    /// Replaces the creation timestamp.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Folds the messages and origin traces of `cause` and its source chain
    /// into `details` and `traces`.
    pub fn caused_by(mut self, cause: &(dyn std::error::Error + 'static)) -> Self {
        for message in get_messages(cause, usize::MAX) {
            self.push_detail(&message);
        }
        for trace in get_traces(cause, usize::MAX) {
            self.push_trace(&trace);
        }
        self
    }

    /// Inserts or replaces a metadata entry.
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> RailResult<Self> {
        self.insert_metadata(key.into(), value.into())?;
        Ok(self)
    }

    /// Inserts or replaces every entry of `metadata`.
    pub fn with_metadata_map<I, K, V>(mut self, metadata: I) -> RailResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in metadata {
            self.insert_metadata(key.into(), value.into())?;
        }
        Ok(self)
    }

    fn insert_metadata(&mut self, key: String, value: Value) -> RailResult<()> {
        require_non_blank(&key, "key")?;
        if value.is_null() {
            return Err(RailError::NullMetadataValue { key });
        }
        self.metadata.insert(key, value);
        Ok(())
    }

    /// Returns `true` when `key` has a metadata entry. Fails on a blank key.
    pub fn has_metadata_key(&self, key: &str) -> RailResult<bool> {
        require_non_blank(key, "key")?;
        Ok(self.metadata.contains_key(key))
    }

    /// Applies `predicate` to the value stored under `key`; `false` when absent.
    pub fn has_metadata<F>(&self, key: &str, predicate: F) -> RailResult<bool>
    where
        F: FnOnce(&Value) -> bool,
    {
        require_non_blank(key, "key")?;
        Ok(self.metadata.get(key).is_some_and(predicate))
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message
            && self.error_type == other.error_type
            && self.title == other.title
            && self.status == other.status
            && self.details == other.details
            && self.metadata == other.metadata
    }
}

impl Eq for Error {}

impl Hash for Error {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.message.hash(state);
        self.error_type.hash(state);
        self.title.hash(state);
        self.status.hash(state);
        self.details.hash(state);
        // serde_json::Value is not Hash; its canonical text is.
        for (key, value) in &self.metadata {
            key.hash(state);
            value.to_string().hash(state);
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}
