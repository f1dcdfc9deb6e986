//! Read-only view of the request being answered.
//!
//! The mapping layer needs the method, path, content type, a trace
//! identifier and the `x-request-id` header. [`RequestContext`] exposes
//! exactly that; it is implemented for [`http::Request`] and for the owned
//! snapshot [`RequestInfo`].

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::marker::PhantomData;

#[cfg(feature = "async-tokio")]
use std::future::Future;
#[cfg(feature = "async-tokio")]
use tokio::task::futures::TaskLocalFuture;

use crate::error::is_blank;

/// Header carrying the caller's request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";
/// Reserved; not read by the mapping layer.
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Request-scoped trace identifier, stored in [`http::Extensions`] by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TraceIdentifier(pub String);

/// The parts of a request that problem documents are built from.
pub trait RequestContext {
    /// HTTP method, e.g. `GET`.
    fn method(&self) -> &str;

    /// Request path without the query string.
    fn path(&self) -> &str;

    /// Raw `content-type` header value, if present.
    fn content_type(&self) -> Option<&str>;

    /// The host-assigned identifier of this request, if any.
    fn trace_identifier(&self) -> Option<&str>;

    /// Looks up a header by case-insensitive name.
    fn header(&self, name: &str) -> Option<&str>;
}

/// Supplies the request currently being handled, if there is one.
pub trait RequestContextAccessor: Send + Sync {
    /// A snapshot of the current request, or `None` outside of one.
    fn current(&self) -> Option<RequestInfo>;
}

/// Owned snapshot of the parts of a request the mapping layer reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestInfo {
    method: String,
    path: String,
    content_type: Option<String>,
    trace_identifier: String,
    headers: BTreeMap<String, String>,
}

impl RequestInfo {
    /// A snapshot with a freshly generated trace identifier.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            content_type: None,
            trace_identifier: uuid::Uuid::new_v4().to_string(),
            headers: BTreeMap::new(),
        }
    }

    /// Captures method, path, headers and trace identifier from an [`http::Request`].
    ///
    /// Without a [`TraceIdentifier`] extension a fresh identifier is generated.
    pub fn from_request<B>(request: &http::Request<B>) -> Self {
        let headers = request
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|v| (name.as_str().to_owned(), v.to_owned()))
            })
            .collect::<BTreeMap<_, _>>();

        let mut info = Self::new(request.method().as_str(), request.uri().path());
        info.content_type = headers.get(http::header::CONTENT_TYPE.as_str()).cloned();
        info.headers = headers;
        if let Some(TraceIdentifier(id)) = request.extensions().get::<TraceIdentifier>() {
            info.trace_identifier = id.clone();
        }
        info
    }

    /// Captures only what a problem document reads: method, path, content
    /// type, `x-request-id` and the [`TraceIdentifier`] extension.
    ///
    /// No identifier is generated here; see [`ensure_trace_identifier`](Self::ensure_trace_identifier).
    pub fn capture<B>(request: &http::Request<B>) -> Self {
        let mut headers = BTreeMap::new();
        if let Some(request_id) = header_str(request, REQUEST_ID_HEADER) {
            headers.insert(REQUEST_ID_HEADER.to_owned(), request_id.to_owned());
        }

        Self {
            method: request.method().as_str().to_owned(),
            path: request.uri().path().to_owned(),
            content_type: header_str(request, http::header::CONTENT_TYPE.as_str()).map(str::to_owned),
            trace_identifier: request
                .extensions()
                .get::<TraceIdentifier>()
                .map(|TraceIdentifier(id)| id.clone())
                .unwrap_or_default(),
            headers,
        }
    }

    /// Assigns a fresh trace identifier when none was captured.
    pub fn ensure_trace_identifier(&mut self) {
        if self.trace_identifier.is_empty() {
            self.trace_identifier = uuid::Uuid::new_v4().to_string();
        }
    }

    /// Sets the content type the version is read from.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Replaces the trace identifier.
    pub fn with_trace_identifier(mut self, trace_identifier: impl Into<String>) -> Self {
        self.trace_identifier = trace_identifier.into();
        self
    }

    /// Records a header; names are stored lower-case.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }
}

impl RequestContext for RequestInfo {
    fn method(&self) -> &str {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    fn trace_identifier(&self) -> Option<&str> {
        Some(self.trace_identifier.as_str()).filter(|id| !id.is_empty())
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

impl<B> RequestContext for http::Request<B> {
    fn method(&self) -> &str {
        http::Request::method(self).as_str()
    }

    fn path(&self) -> &str {
        self.uri().path()
    }

    fn content_type(&self) -> Option<&str> {
        header_str(self, http::header::CONTENT_TYPE.as_str())
    }

    fn trace_identifier(&self) -> Option<&str> {
        self.extensions().get::<TraceIdentifier>().map(|id| id.0.as_str())
    }

    fn header(&self, name: &str) -> Option<&str> {
        header_str(self, name)
    }
}

fn header_str<'r, B>(request: &'r http::Request<B>, name: &str) -> Option<&'r str> {
    request.headers().get(name).and_then(|v| v.to_str().ok())
}

thread_local! {
    static CURRENT: RefCell<Option<RequestInfo>> = const { RefCell::new(None) };
}

#[cfg(feature = "async-tokio")]
tokio::task_local! {
    static TASK_REQUEST: RequestInfo;
}

/// Accessor for the request being handled.
///
/// Async hosts run each request inside [`CurrentRequest::scope`] (feature
/// `async-tokio`); the request then follows the task across `.await` points
/// and worker threads. The `tower` boundary service does this for every
/// request it serves.
///
/// Synchronous hosts enter a request with [`CurrentRequest::enter`] for the
/// duration of the handling; the returned guard is bound to the thread and
/// restores the previous request when dropped. A task-scoped request takes
/// precedence over the thread-local one.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentRequest;

impl CurrentRequest {
    /// Makes `request` current on this thread until the guard is dropped.
    pub fn enter(request: RequestInfo) -> CurrentRequestGuard {
        let previous = CURRENT.with(|slot| slot.replace(Some(request)));
        CurrentRequestGuard { previous, _thread_bound: PhantomData }
    }

    /// Makes `request` current while `future` is polled.
    #[cfg(feature = "async-tokio")]
    pub fn scope<F>(request: RequestInfo, future: F) -> TaskLocalFuture<RequestInfo, F>
    where
        F: Future,
    {
        TASK_REQUEST.scope(request, future)
    }
}

impl RequestContextAccessor for CurrentRequest {
    fn current(&self) -> Option<RequestInfo> {
        task_request().or_else(|| CURRENT.with(|slot| slot.borrow().clone()))
    }
}

#[cfg(feature = "async-tokio")]
fn task_request() -> Option<RequestInfo> {
    TASK_REQUEST.try_with(RequestInfo::clone).ok()
}

#[cfg(not(feature = "async-tokio"))]
fn task_request() -> Option<RequestInfo> {
    None
}

/// Restores the previously entered request on drop.
///
/// The guard cannot leave the thread that entered the request:
///
/// ```compile_fail
/// fn assert_send<T: Send>() {}
/// assert_send::<problem_rail::mapping::CurrentRequestGuard>();
/// ```
#[must_use = "the request is left as soon as the guard is dropped"]
#[derive(Debug)]
pub struct CurrentRequestGuard {
    previous: Option<RequestInfo>,
    _thread_bound: PhantomData<*const ()>,
}

impl Drop for CurrentRequestGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT.with(|slot| *slot.borrow_mut() = previous);
    }
}

/// Reads the API version from a content type: the text after the first `v=`
/// up to the next space or `;`. Empty when absent.
///
/// ```
/// use problem_rail::mapping::version_from_content_type;
///
/// assert_eq!(version_from_content_type(Some("application/problem+json; v=123")), "123");
/// assert_eq!(version_from_content_type(Some("application/json")), "");
/// assert_eq!(version_from_content_type(None), "");
/// ```
pub fn version_from_content_type(content_type: Option<&str>) -> String {
    let Some(content_type) = content_type.filter(|ct| !is_blank(ct)) else {
        return String::new();
    };

    match content_type.find("v=") {
        Some(index) => content_type[index + 2..]
            .chars()
            .take_while(|c| *c != ' ' && *c != ';')
            .collect(),
        None => String::new(),
    }
}
