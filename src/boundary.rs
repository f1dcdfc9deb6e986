//! Last-resort handling of failures that escaped all business logic.
//!
//! [`ExceptionBoundary::handle`] classifies the failure, renders it as a
//! problem document, logs it and returns the finished response. With the
//! `tower` feature, [`crate::tower::ProblemBoundaryLayer`] installs it in
//! front of an `http` service.

use std::error::Error as StdError;

use http::header::{HeaderValue, CONTENT_TYPE};
use http::StatusCode;

use crate::error::RailResult;
use crate::logging::log_unhandled;
use crate::mapping::{
    build_error_from_std, build_problem_document, ProblemDocument, RequestContext,
    APPLICATION_PROBLEM_JSON,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct ExceptionBoundary;

impl ExceptionBoundary {
    pub const fn new() -> Self {
        Self
    }

    /// Classifies `fault` and renders it for the request described by `ctx`.
    pub fn problem_for<C>(&self, ctx: &C, fault: &(dyn StdError + 'static)) -> ProblemDocument
    where
        C: RequestContext + ?Sized,
    {
        build_problem_document(ctx, &build_error_from_std(fault))
    }

    /// Produces the `application/problem+json` response for `fault`.
    ///
    /// The returned response is final; the host should not apply any further
    /// error handling to it.
    pub fn handle<C>(
        &self,
        ctx: &C,
        fault: &(dyn StdError + 'static),
    ) -> RailResult<http::Response<String>>
    where
        C: RequestContext + ?Sized,
    {
        let error = build_error_from_std(fault);
        let problem = build_problem_document(ctx, &error);
        let json = problem.to_json()?;

        log_unhandled(&error, fault, &json);

        let status = problem
            .status
            .and_then(|s| StatusCode::from_u16(s).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = http::Response::new(json);
        *response.status_mut() = status;
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_PROBLEM_JSON));
        Ok(response)
    }
}
