//! Pluggable rendering of outcomes into transport responses.
//!
//! A [`ResponseProfile`] turns a successful outcome into a success response
//! and a failed outcome into a classified failure response.
//! [`ResponseTransformer`] is the single dispatch point; the process-wide
//! profile lives in [`crate::config`].
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use problem_rail::mapping::{CurrentRequest, RequestInfo};
//! use problem_rail::profile::{DefaultResponseProfile, ResponseKind, ResponseTransformer};
//! use problem_rail::{Error, Outcome};
//!
//! let profile = DefaultResponseProfile::new().with_accessor(Arc::new(CurrentRequest));
//! let _request = CurrentRequest::enter(RequestInfo::new("GET", "/accounts/9"));
//!
//! let outcome: Outcome = Outcome::failure(Error::new("account 9 not found")?.as_not_found());
//! let response = ResponseTransformer.transform(&outcome, &profile)?;
//!
//! assert_eq!(response.kind(), ResponseKind::NotFound);
//! assert_eq!(response.status().as_u16(), 404);
//! # Ok::<(), problem_rail::RailError>(())
//! ```

use std::sync::Arc;

use http::header::{HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use serde_json::Value;

use crate::error::{RailError, RailResult};
use crate::mapping::{
    build_problem_document, ProblemDocument, RequestContextAccessor, APPLICATION_PROBLEM_JSON,
};
use crate::types::{Error, Outcome};

pub mod transformer;

pub use transformer::ResponseTransformer;

/// Input of [`ResponseProfile::render_success`].
#[derive(Debug, Clone, Copy)]
pub struct SuccessContext<'a> {
    pub outcome: &'a Outcome,
}

/// Input of [`ResponseProfile::render_success_value`]: the already encoded value.
#[derive(Debug, Clone, PartialEq)]
pub struct SuccessValueContext {
    pub value: Value,
}

/// Input of [`ResponseProfile::render_failure`].
#[derive(Debug, Clone, Copy)]
pub struct FailureContext<'a> {
    pub error: &'a Error,
}

/// Shape of a rendered response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    Ok,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    InternalServerError,
}

impl ResponseKind {
    /// Picks the failure shape for a problem status; unknown statuses are
    /// rendered as internal server errors.
    pub const fn for_failure_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            _ => Self::InternalServerError,
        }
    }

    /// The HTTP status sent for this kind.
    pub const fn status(self) -> StatusCode {
        match self {
            Self::Ok => StatusCode::OK,
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Empty,
    Json(Value),
    Problem(ProblemDocument),
}

/// Transport-neutral response produced by a profile.
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileResponse {
    kind: ResponseKind,
    body: ResponseBody,
}

impl ProfileResponse {
    /// A response of `kind` carrying `body`.
    #[inline]
    pub fn new(kind: ResponseKind, body: ResponseBody) -> Self {
        Self { kind, body }
    }

    #[inline]
    pub fn kind(&self) -> ResponseKind {
        self.kind
    }

    #[inline]
    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    #[inline]
    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    /// The problem document body, if this is a failure response.
    pub fn problem(&self) -> Option<&ProblemDocument> {
        match &self.body {
            ResponseBody::Problem(doc) => Some(doc),
            _ => None,
        }
    }

    /// Encodes into an [`http::Response`]; problem bodies are sent as
    /// `application/problem+json`, values as `application/json`.
    pub fn into_http(self) -> RailResult<http::Response<String>> {
        let status = self.status();
        let (content_type, body) = match self.body {
            ResponseBody::Empty => (None, String::new()),
            ResponseBody::Json(value) => (Some("application/json"), serde_json::to_string(&value)?),
            ResponseBody::Problem(doc) => (Some(APPLICATION_PROBLEM_JSON), doc.to_json()?),
        };

        let mut response = http::Response::new(body);
        *response.status_mut() = status;
        if let Some(content_type) = content_type {
            response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        Ok(response)
    }
}

/// Strategy converting outcomes into responses.
pub trait ResponseProfile: Send + Sync {
    fn render_success(&self, context: SuccessContext<'_>) -> ProfileResponse;

    fn render_success_value(&self, context: SuccessValueContext) -> ProfileResponse;

    fn render_failure(&self, context: FailureContext<'_>) -> RailResult<ProfileResponse>;
}

/// The stock profile: 200 for successes, a problem document for failures.
#[derive(Clone, Default)]
pub struct DefaultResponseProfile {
    accessor: Option<Arc<dyn RequestContextAccessor>>,
}

impl DefaultResponseProfile {
    /// A profile without request access; it cannot render failures until an
    /// accessor is attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches the source of the current request.
    pub fn with_accessor(mut self, accessor: Arc<dyn RequestContextAccessor>) -> Self {
        self.accessor = Some(accessor);
        self
    }

    pub fn has_accessor(&self) -> bool {
        self.accessor.is_some()
    }
}

impl std::fmt::Debug for DefaultResponseProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultResponseProfile")
            .field("has_accessor", &self.has_accessor())
            .finish()
    }
}

impl ResponseProfile for DefaultResponseProfile {
    fn render_success(&self, _context: SuccessContext<'_>) -> ProfileResponse {
        ProfileResponse::new(ResponseKind::Ok, ResponseBody::Empty)
    }

    fn render_success_value(&self, context: SuccessValueContext) -> ProfileResponse {
        ProfileResponse::new(ResponseKind::Ok, ResponseBody::Json(context.value))
    }

    fn render_failure(&self, context: FailureContext<'_>) -> RailResult<ProfileResponse> {
        let mut request = self
            .accessor
            .as_ref()
            .and_then(|accessor| accessor.current())
            .ok_or(RailError::MissingRequestContext)?;
        request.ensure_trace_identifier();

        let problem = build_problem_document(&request, context.error);
        let kind = ResponseKind::for_failure_status(problem.status.unwrap_or_default());
        Ok(ProfileResponse::new(kind, ResponseBody::Problem(problem)))
    }
}
