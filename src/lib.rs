//! Uniform failure envelopes and RFC 7807 problem responses for HTTP services.
//!
//! Business code returns an [`Outcome`], which is either a success (optionally
//! carrying a value) or a failure carrying a classified [`Error`]. A
//! [`ResponseProfile`](profile::ResponseProfile) renders outcomes into
//! responses, and failures become `application/problem+json` documents
//! enriched with a timestamp, trace and request identifiers and the API
//! version. Failures that escape business code entirely are caught by the
//! [`ExceptionBoundary`](boundary::ExceptionBoundary).
//!
//! # Examples
//!
//! ## Classifying an Error
//!
//! ```
//! use problem_rail::Error;
//!
//! let err = Error::new("email is malformed")?
//!     .as_bad_request("ValidationError", "The request was invalid.")?
//!     .with_metadata("field", "email")?;
//!
//! assert_eq!(err.status(), 400);
//! assert!(err.has_metadata_key("field")?);
//! # Ok::<(), problem_rail::RailError>(())
//! ```
//!
//! ## Rendering a Problem Document
//!
//! ```
//! use problem_rail::mapping::{build_problem_document, RequestInfo};
//! use problem_rail::Error;
//!
//! let request = RequestInfo::new("GET", "/orders/17")
//!     .with_content_type("application/json; v=2");
//! let problem = build_problem_document(&request, &Error::new("order 17 not found")?.as_not_found());
//!
//! assert_eq!(problem.status, Some(404));
//! assert_eq!(problem.instance.as_deref(), Some("GET /orders/17"));
//! assert_eq!(problem.version(), Some("2"));
//! # Ok::<(), problem_rail::RailError>(())
//! ```

/// Crate-level error type for contract violations
pub mod error;
/// The failure envelope and the outcome container
pub mod types;
/// Classified faults raised by business code
pub mod fault;
/// Conversions between faults, errors and problem documents
pub mod mapping;
/// Pluggable response rendering
pub mod profile;
/// Process-wide profile configuration
pub mod config;
/// Structured logging of errors
pub mod logging;
/// Last-resort handling of unhandled faults
pub mod boundary;
/// Extension traits for outcomes and results
pub mod traits;
/// Convenience re-exports for quick starts
pub mod prelude;

/// Async rendering of outcomes (requires `async` feature)
#[cfg(feature = "async")]
pub mod async_ext;

/// Tower integration - Layer and Service implementations (requires `tower` feature)
#[cfg(feature = "tower")]
pub mod tower;

pub use boundary::ExceptionBoundary;
pub use error::{RailError, RailResult};
pub use fault::{BoxError, Classification, Fault, FaultKind};
pub use mapping::{ProblemDocument, ValidationProblemDocument};
pub use traits::*;
pub use types::{Error, ErrorVec, Outcome};
