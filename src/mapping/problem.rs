//! The problem document: the transport-level failure envelope.
//!
//! Serialized as `application/problem+json` with the core members `title`,
//! `type`, `status`, `instance` and `detail`, plus the extension members
//! `timestamp`, `traceId`, `requestId` and `version`.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RailResult;
use crate::mapping::request::{version_from_content_type, RequestContext, REQUEST_ID_HEADER};
use crate::types::Error;

/// Media type of serialized problem documents.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

pub const TIMESTAMP_EXTENSION: &str = "timestamp";
pub const TRACE_ID_EXTENSION: &str = "traceId";
pub const REQUEST_ID_EXTENSION: &str = "requestId";
pub const VERSION_EXTENSION: &str = "version";

const VALIDATION_TITLE: &str = "validation failed";
const VALIDATION_TYPE: &str = "ValidationError";
const VALIDATION_DETAIL: &str = "not all request parameters satisfy the required conditions";

/// Failure envelope returned to callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub problem_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Extension members, serialized inline.
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl ProblemDocument {
    /// Looks up an extension member by name.
    #[inline]
    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.extensions.get(key)
    }

    /// Inserts an extension member unless one with the same key exists.
    pub fn insert_extension_if_absent(&mut self, key: &str, value: impl Into<Value>) {
        if !self.extensions.contains_key(key) {
            self.extensions.insert(key.to_owned(), value.into());
        }
    }

    /// The `timestamp` member, when it is a string in RFC 3339 form.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.extension_str(TIMESTAMP_EXTENSION)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|ts| ts.with_timezone(&Utc))
    }

    /// The `traceId` member.
    pub fn trace_id(&self) -> Option<&str> {
        self.extension_str(TRACE_ID_EXTENSION)
    }

    /// The `requestId` member.
    pub fn request_id(&self) -> Option<&str> {
        self.extension_str(REQUEST_ID_EXTENSION)
    }

    /// The `version` member.
    pub fn version(&self) -> Option<&str> {
        self.extension_str(VERSION_EXTENSION)
    }

    fn extension_str(&self, key: &str) -> Option<&str> {
        self.extensions.get(key).and_then(Value::as_str)
    }

    /// Serializes as `application/problem+json` text.
    pub fn to_json(&self) -> RailResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a received document.
    pub fn from_json(json: &str) -> RailResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Converts back into an [`Error`]; see [`parse_problem_document`].
    pub fn to_error(&self) -> RailResult<Error> {
        parse_problem_document(self)
    }
}

/// Per-field validation messages, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` against `field`, ignoring exact duplicates.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) -> &mut Self {
        let messages = self.fields.entry(field.into()).or_default();
        let message = message.into();
        if !messages.contains(&message) {
            messages.push(message);
        }
        self
    }

    /// Messages recorded for `field`.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields with at least one message.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }
}

impl<F, M> FromIterator<(F, M)> for FieldErrors
where
    F: Into<String>,
    M: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (F, M)>>(iter: I) -> Self {
        let mut errors = Self::new();
        for (field, message) in iter {
            errors.add(field, message);
        }
        errors
    }
}

/// Problem document for request validation failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationProblemDocument {
    #[serde(flatten)]
    pub problem: ProblemDocument,
    #[serde(default)]
    pub errors: FieldErrors,
}

/// Renders `error` for the request described by `ctx`.
pub fn build_problem_document<C>(ctx: &C, error: &Error) -> ProblemDocument
where
    C: RequestContext + ?Sized,
{
    let mut doc = ProblemDocument {
        title: Some(error.title().to_owned()),
        problem_type: Some(error.error_type().to_owned()),
        status: Some(error.status()),
        instance: Some(instance_of(ctx)),
        detail: Some(error.message().to_owned()),
        extensions: Map::new(),
    };

    doc.extensions.insert(TIMESTAMP_EXTENSION.into(), format_timestamp(error.timestamp()).into());
    apply_request_extensions(&mut doc, ctx);
    doc
}

/// Renders field-level validation failures for the request described by `ctx`.
pub fn build_validation_problem_document<C>(
    ctx: &C,
    errors: FieldErrors,
) -> ValidationProblemDocument
where
    C: RequestContext + ?Sized,
{
    let mut problem = ProblemDocument {
        title: Some(VALIDATION_TITLE.into()),
        problem_type: Some(VALIDATION_TYPE.into()),
        status: Some(400),
        instance: Some(instance_of(ctx)),
        detail: Some(VALIDATION_DETAIL.into()),
        extensions: Map::new(),
    };

    problem.extensions.insert(TIMESTAMP_EXTENSION.into(), format_timestamp(Utc::now()).into());
    apply_request_extensions(&mut problem, ctx);
    ValidationProblemDocument { problem, errors }
}

/// Rebuilds an [`Error`] from a received problem document.
///
/// 401, 403 and 404 map to their fixed classifications, any other 4xx to a
/// bad request and everything else to an internal server error, each with
/// the document's `type` and `title`. The `timestamp` member is copied when
/// it parses. Metadata, details and traces are not transported.
pub fn parse_problem_document(doc: &ProblemDocument) -> RailResult<Error> {
    let error = Error::new(doc.detail.clone().unwrap_or_default())?;
    let error_type = doc.problem_type.clone().unwrap_or_default();
    let title = doc.title.clone().unwrap_or_default();

    let error = match doc.status.unwrap_or_default() {
        401 => error.as_unauthorized(),
        403 => error.as_forbidden(),
        404 => error.as_not_found(),
        400..=499 => error.as_bad_request(error_type, title)?,
        _ => error.as_internal_server(error_type, title)?,
    };

    Ok(match doc.timestamp() {
        Some(timestamp) => error.with_timestamp(timestamp),
        None => error,
    })
}

fn instance_of<C: RequestContext + ?Sized>(ctx: &C) -> String {
    format!("{} {}", ctx.method(), ctx.path())
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn apply_request_extensions<C: RequestContext + ?Sized>(doc: &mut ProblemDocument, ctx: &C) {
    let trace_id = active_trace_id()
        .or_else(|| ctx.trace_identifier().map(str::to_owned))
        .unwrap_or_default();
    doc.insert_extension_if_absent(TRACE_ID_EXTENSION, trace_id);

    let request_id = ctx.header(REQUEST_ID_HEADER).unwrap_or_default().to_owned();
    doc.extensions.insert(REQUEST_ID_EXTENSION.into(), request_id.into());

    let version = version_from_content_type(ctx.content_type());
    doc.extensions.insert(VERSION_EXTENSION.into(), version.into());
}

/// Identifier of the active `tracing` span, when a subscriber is recording one.
fn active_trace_id() -> Option<String> {
    tracing::Span::current().id().map(|id| format!("{:016x}", id.into_u64()))
}
