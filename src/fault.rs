//! The fault taxonomy: classified failures raised from business logic.
//!
//! A [`Fault`] is the raised counterpart of [`Error`](crate::Error). Its
//! [`FaultKind`] is a closed set, so mapping a fault to an HTTP status class
//! is an exhaustive `match` rather than type inspection.
//!
//! Every fault records the call site that raised it and captures a
//! [`Backtrace`] (subject to `RUST_BACKTRACE`); both feed
//! [`get_traces`](crate::mapping::get_traces).
//!
//! # Examples
//!
//! ```
//! use problem_rail::{Fault, FaultKind};
//!
//! let fault = Fault::bad_request("amount must be positive", "AmountError", "Invalid amount.")?;
//! assert_eq!(fault.kind().status(), 400);
//! assert_eq!(fault.to_string(), "amount must be positive");
//! # Ok::<(), problem_rail::RailError>(())
//! ```

use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;
use std::panic::Location;

use crate::error::{is_blank, require_non_blank, RailError, RailResult};

/// Boxed cause attached to a fault.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// A caller-supplied `(error_type, error_title)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Classification {
    pub error_type: String,
    pub error_title: String,
}

impl Classification {
    /// Both parts are required.
    pub fn new(
        error_type: impl Into<String>,
        error_title: impl Into<String>,
        kind: &'static str,
    ) -> RailResult<Self> {
        let (error_type, error_title) = (error_type.into(), error_title.into());
        if is_blank(&error_type) || is_blank(&error_title) {
            return Err(RailError::MissingClassification { kind });
        }
        Ok(Self { error_type, error_title })
    }
}

/// What a fault represents, and therefore which status class it maps to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FaultKind {
    /// 400, with a mandatory classification.
    BadRequest(Classification),
    /// 401.
    Unauthorized,
    /// 403.
    Forbidden,
    /// 404.
    NotFound,
    /// 500, optionally classified.
    InternalServer(Option<Classification>),
}

impl FaultKind {
    /// Default HTTP status class of the kind.
    pub const fn status(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::InternalServer(_) => 500,
        }
    }

    /// Lower-case name of the kind, for messages.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad request",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not found",
            Self::InternalServer(_) => "internal server error",
        }
    }
}

/// A classified failure raised by business logic.
#[derive(Debug)]
pub struct Fault {
    kind: FaultKind,
    message: String,
    location: &'static Location<'static>,
    backtrace: Backtrace,
    source: Option<BoxError>,
}

impl Fault {
    #[track_caller]
    fn raise(kind: FaultKind, message: String) -> RailResult<Self> {
        require_non_blank(&message, "message")?;
        Ok(Self {
            kind,
            message,
            location: Location::caller(),
            backtrace: Backtrace::capture(),
            source: None,
        })
    }

    /// A 400 fault. `error_type` and `error_title` are both required.
    #[track_caller]
    pub fn bad_request(
        message: impl Into<String>,
        error_type: impl Into<String>,
        error_title: impl Into<String>,
    ) -> RailResult<Self> {
        let classification = Classification::new(error_type, error_title, "bad request")?;
        Self::raise(FaultKind::BadRequest(classification), message.into())
    }

    /// A 401 fault.
    #[track_caller]
    pub fn unauthorized(message: impl Into<String>) -> RailResult<Self> {
        Self::raise(FaultKind::Unauthorized, message.into())
    }

    /// A 403 fault.
    #[track_caller]
    pub fn forbidden(message: impl Into<String>) -> RailResult<Self> {
        Self::raise(FaultKind::Forbidden, message.into())
    }

    /// A 404 fault.
    #[track_caller]
    pub fn not_found(message: impl Into<String>) -> RailResult<Self> {
        Self::raise(FaultKind::NotFound, message.into())
    }

    /// An unclassified 500 fault.
    #[track_caller]
    pub fn internal_server(message: impl Into<String>) -> RailResult<Self> {
        Self::raise(FaultKind::InternalServer(None), message.into())
    }

    /// A 500 fault with its own classification; both parts are required.
    #[track_caller]
    pub fn internal_server_classified(
        message: impl Into<String>,
        error_type: impl Into<String>,
        error_title: impl Into<String>,
    ) -> RailResult<Self> {
        let classification =
            Classification::new(error_type, error_title, "internal server error")?;
        Self::raise(FaultKind::InternalServer(Some(classification)), message.into())
    }

    /// Attaches the underlying cause.
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// The kind, and with it the status class.
    #[inline]
    pub fn kind(&self) -> &FaultKind {
        &self.kind
    }

    /// The message supplied when the fault was raised.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Where the fault was raised.
    #[inline]
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// Backtrace captured when the fault was raised.
    #[inline]
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for Fault {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_deref().map(|s| s as &(dyn StdError + 'static))
    }
}
