//! Crate-level error type.
//!
//! [`RailError`] reports misuse of the API (blank arguments, missing
//! classification pairs, reading a value out of a failed outcome) and the
//! configuration/encoding failures of the response layer. It is distinct from
//! [`crate::Error`], which is the *domain* failure value this crate renders.

use thiserror::Error;

/// Failures raised by this crate's own operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RailError {
    /// A required string argument was empty or whitespace.
    #[error("argument `{name}` must not be blank")]
    BlankArgument {
        /// Name of the offending argument.
        name: &'static str,
    },

    /// An error type/title pair was incomplete.
    #[error("{kind} requires both an error type and an error title")]
    MissingClassification {
        /// The classification that was being applied.
        kind: &'static str,
    },

    /// `serde_json::Value::Null` was supplied as a metadata value.
    #[error("metadata value for key `{key}` must not be null")]
    NullMetadataValue {
        /// Metadata key that received the null value.
        key: String,
    },

    /// The value of a failed outcome was requested.
    #[error("value is not available on a failed outcome")]
    ValueUnavailable,

    /// A failure had to be rendered but no request context was available.
    #[error("no request context is available; register a RequestContextAccessor on the response profile")]
    MissingRequestContext,

    /// JSON encoding or decoding failed.
    #[error("json codec failure: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for operations that can fail with [`RailError`].
pub type RailResult<T> = Result<T, RailError>;

/// Returns `true` when `text` is empty or consists only of whitespace.
#[inline]
pub(crate) fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Fails with [`RailError::BlankArgument`] when `value` is blank.
#[inline]
pub(crate) fn require_non_blank(value: &str, name: &'static str) -> RailResult<()> {
    if is_blank(value) {
        return Err(RailError::BlankArgument { name });
    }
    Ok(())
}
