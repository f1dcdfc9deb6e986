//! Tower integration for the exception boundary.
//!
//! [`ProblemBoundaryLayer`] wraps an `http` service. While the inner service
//! runs, the request is current for [`CurrentRequest`], so response profiles
//! can render failures from inside handlers. When the inner service fails,
//! the failure is rendered by [`ExceptionBoundary`] and returned as a
//! successful `application/problem+json` response, so the host never sees
//! the error.
//!
//! # Feature Flag
//!
//! Requires the `tower` feature:
//!
//! ```toml
//! [dependencies]
//! problem-rail = { version = "0.1", features = ["tower"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use problem_rail::tower::ProblemBoundaryLayer;
//! use tower::ServiceBuilder;
//!
//! let service = ServiceBuilder::new()
//!     .layer(ProblemBoundaryLayer::new())
//!     .service(my_http_service);
//! ```

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

use futures_core::future::FusedFuture;
use pin_project_lite::pin_project;
use tokio::task::futures::TaskLocalFuture;
use tower::{Layer, Service};

use crate::boundary::ExceptionBoundary;
use crate::fault::BoxError;
use crate::mapping::{CurrentRequest, RequestInfo};

/// A Tower [`Layer`] that turns service failures into problem responses.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProblemBoundaryLayer {
    boundary: ExceptionBoundary,
}

impl ProblemBoundaryLayer {
    /// Creates the layer.
    #[inline]
    pub const fn new() -> Self {
        Self { boundary: ExceptionBoundary::new() }
    }
}

impl<S> Layer<S> for ProblemBoundaryLayer {
    type Service = ProblemBoundaryService<S>;

    #[inline]
    fn layer(&self, inner: S) -> Self::Service {
        ProblemBoundaryService { inner, boundary: self.boundary }
    }
}

/// A Tower [`Service`] created by [`ProblemBoundaryLayer`].
#[derive(Clone, Debug)]
pub struct ProblemBoundaryService<S> {
    inner: S,
    boundary: ExceptionBoundary,
}

impl<S> ProblemBoundaryService<S> {
    /// Wraps `inner` directly, without going through the layer.
    #[inline]
    pub const fn new(inner: S) -> Self {
        Self { inner, boundary: ExceptionBoundary::new() }
    }

    /// Gets a reference to the inner service.
    #[inline]
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    /// Gets a mutable reference to the inner service.
    #[inline]
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Consumes the wrapper, returning the inner service.
    #[inline]
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, ReqBody, ResBody> Service<http::Request<ReqBody>> for ProblemBoundaryService<S>
where
    S: Service<http::Request<ReqBody>, Response = http::Response<ResBody>>,
    S::Error: Into<BoxError>,
    ResBody: From<String>,
{
    type Response = http::Response<ResBody>;
    type Error = BoxError;
    type Future = ProblemBoundaryFuture<TaskLocalFuture<RequestInfo, S::Future>>;

    #[inline]
    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, request: http::Request<ReqBody>) -> Self::Future {
        let info = RequestInfo::capture(&request);
        let inner = CurrentRequest::scope(info.clone(), self.inner.call(request));
        ProblemBoundaryFuture::new(inner, info, self.boundary)
    }
}

pin_project! {
    /// Future returned by [`ProblemBoundaryService`].
    #[must_use = "futures do nothing unless polled"]
    pub struct ProblemBoundaryFuture<F> {
        #[pin]
        inner: F,
        request: Option<RequestInfo>,
        boundary: ExceptionBoundary,
    }
}

impl<F> ProblemBoundaryFuture<F> {
    #[inline]
    fn new(inner: F, request: RequestInfo, boundary: ExceptionBoundary) -> Self {
        Self { inner, request: Some(request), boundary }
    }
}

impl<F, ResBody, E> Future for ProblemBoundaryFuture<F>
where
    F: Future<Output = Result<http::Response<ResBody>, E>>,
    E: Into<BoxError>,
    ResBody: From<String>,
{
    type Output = Result<http::Response<ResBody>, BoxError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();

        match this.inner.poll(cx) {
            Poll::Ready(Ok(response)) => {
                this.request.take();
                Poll::Ready(Ok(response))
            },
            Poll::Ready(Err(error)) => {
                // request is Some until the first Ready result
                let mut request = this.request.take().expect("polled after completion");
                request.ensure_trace_identifier();
                let error: BoxError = error.into();
                let rendered = this
                    .boundary
                    .handle(&request, &*error)
                    .map(|response| response.map(ResBody::from))
                    .map_err(BoxError::from);
                Poll::Ready(rendered)
            },
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<F, ResBody, E> FusedFuture for ProblemBoundaryFuture<F>
where
    F: FusedFuture<Output = Result<http::Response<ResBody>, E>>,
    E: Into<BoxError>,
    ResBody: From<String>,
{
    #[inline]
    fn is_terminated(&self) -> bool {
        self.request.is_none() || self.inner.is_terminated()
    }
}

/// Extension trait for wrapping services with the exception boundary.
pub trait ServiceBoundaryExt<Request>: Service<Request> + Sized {
    /// Wraps the service in a [`ProblemBoundaryService`].
    fn with_problem_boundary(self) -> ProblemBoundaryService<Self> {
        ProblemBoundaryService::new(self)
    }
}

impl<S, Request> ServiceBoundaryExt<Request> for S where S: Service<Request> {}
