use std::sync::Arc;

use http::header::CONTENT_TYPE;
use problem_rail::config;
use problem_rail::mapping::{CurrentRequest, ProblemDocument, RequestContextAccessor, RequestInfo};
use problem_rail::profile::{
    DefaultResponseProfile, FailureContext, ProfileResponse, ResponseBody, ResponseKind,
    ResponseProfile, ResponseTransformer, SuccessContext, SuccessValueContext,
};
use problem_rail::{Error, Outcome, OutcomeExt, OutcomeValueExt, RailError};
use serde::Serialize;
use serde_json::json;

/// Always answers with the same request.
struct FixedRequest(RequestInfo);

impl RequestContextAccessor for FixedRequest {
    fn current(&self) -> Option<RequestInfo> {
        Some(self.0.clone())
    }
}

fn profile() -> DefaultResponseProfile {
    let request = RequestInfo::new("PUT", "/users/5").with_header("x-request-id", "req-5");
    DefaultResponseProfile::new().with_accessor(Arc::new(FixedRequest(request)))
}

#[derive(Serialize)]
struct User {
    id: u32,
    name: &'static str,
}

#[test]
fn empty_success_is_ok_without_body() {
    let outcome: Outcome = Outcome::success();
    let response = outcome.into_response_with(&profile()).unwrap();

    assert_eq!(response.kind(), ResponseKind::Ok);
    assert_eq!(response.body(), &ResponseBody::Empty);

    let http = response.into_http().unwrap();
    assert_eq!(http.status(), 200);
    assert!(http.headers().get(CONTENT_TYPE).is_none());
    assert!(http.body().is_empty());
}

#[test]
fn value_success_is_json() {
    let outcome = Outcome::success_with(User { id: 5, name: "ada" });
    let response = outcome.into_value_response_with(&profile()).unwrap();

    assert_eq!(response.body(), &ResponseBody::Json(json!({"id": 5, "name": "ada"})));

    let http = response.into_http().unwrap();
    assert_eq!(http.headers()[CONTENT_TYPE], "application/json");
    assert_eq!(http.body(), r#"{"id":5,"name":"ada"}"#);
}

#[test]
fn failures_render_by_status() {
    let cases = [
        (Error::new("bad").unwrap().as_bad_request("InputError", "Bad input").unwrap(), ResponseKind::BadRequest),
        (Error::new("who").unwrap().as_unauthorized(), ResponseKind::Unauthorized),
        (Error::new("no").unwrap().as_forbidden(), ResponseKind::Forbidden),
        (Error::new("gone").unwrap().as_not_found(), ResponseKind::NotFound),
        (Error::new("crash").unwrap(), ResponseKind::InternalServerError),
    ];

    for (error, kind) in cases {
        let outcome: Outcome = Outcome::failure(error.clone());
        let response = ResponseTransformer.transform(&outcome, &profile()).unwrap();

        assert_eq!(response.kind(), kind);
        assert_eq!(response.status().as_u16(), error.status());
        let problem = response.problem().unwrap();
        assert_eq!(problem.detail.as_deref(), Some(error.message()));
        assert_eq!(problem.instance.as_deref(), Some("PUT /users/5"));
        assert_eq!(problem.request_id(), Some("req-5"));
    }
}

#[test]
fn failed_value_outcome_renders_the_error() {
    let outcome: Outcome<User> = Outcome::failure(Error::new("user 5 not found").unwrap().as_not_found());
    let http = outcome.into_value_response_with(&profile()).unwrap().into_http().unwrap();

    assert_eq!(http.status(), 404);
    assert_eq!(http.headers()[CONTENT_TYPE], "application/problem+json");
    let doc = ProblemDocument::from_json(http.body()).unwrap();
    assert_eq!(doc.detail.as_deref(), Some("user 5 not found"));
}

#[test]
fn failure_without_request_is_rejected() {
    let outcome: Outcome = Outcome::failure(Error::new("boom").unwrap());
    let profile = DefaultResponseProfile::new().with_accessor(Arc::new(CurrentRequest));

    let err = outcome.into_response_with(&profile).unwrap_err();
    assert!(matches!(err, RailError::MissingRequestContext));
}

#[test]
fn thread_local_request_is_used_while_entered() {
    let profile = DefaultResponseProfile::new().with_accessor(Arc::new(CurrentRequest));
    let outcome: Outcome = Outcome::failure(Error::new("boom").unwrap());

    let _guard = CurrentRequest::enter(RequestInfo::new("GET", "/health"));
    let response = outcome.into_response_with(&profile).unwrap();
    assert_eq!(response.problem().unwrap().instance.as_deref(), Some("GET /health"));
}

/// Wraps every failure in a 200 envelope.
struct EnvelopeProfile;

impl ResponseProfile for EnvelopeProfile {
    fn render_success(&self, _context: SuccessContext<'_>) -> ProfileResponse {
        ProfileResponse::new(ResponseKind::Ok, ResponseBody::Json(json!({"ok": true})))
    }

    fn render_success_value(&self, context: SuccessValueContext) -> ProfileResponse {
        ProfileResponse::new(ResponseKind::Ok, ResponseBody::Json(json!({"ok": true, "data": context.value})))
    }

    fn render_failure(&self, context: FailureContext<'_>) -> Result<ProfileResponse, RailError> {
        Ok(ProfileResponse::new(
            ResponseKind::Ok,
            ResponseBody::Json(json!({"ok": false, "error": context.error})),
        ))
    }
}

#[test]
fn custom_profiles_control_the_shape() {
    let failed: Outcome = Outcome::failure(Error::new("boom").unwrap().as_forbidden());
    let response = failed.into_response_with(&EnvelopeProfile).unwrap();

    assert_eq!(response.kind(), ResponseKind::Ok);
    match response.body() {
        ResponseBody::Json(value) => {
            assert_eq!(value["ok"], false);
            assert_eq!(value["error"]["status"], 403);
        },
        other => panic!("unexpected body {other:?}"),
    }

    let value = Outcome::success_with(3).into_value_response_with(&EnvelopeProfile).unwrap();
    assert_eq!(value.body(), &ResponseBody::Json(json!({"ok": true, "data": 3})));
}

#[test]
fn configured_profile_is_used_process_wide() {
    config::setup(|settings| {
        settings.use_profile(DefaultResponseProfile::new().with_accessor(Arc::new(CurrentRequest)));
    });

    let _guard = CurrentRequest::enter(RequestInfo::new("GET", "/configured"));
    let outcome: Outcome = Outcome::failure(Error::new("boom").unwrap().as_not_found());
    let response = outcome.into_response().unwrap();

    assert_eq!(response.kind(), ResponseKind::NotFound);
    assert_eq!(response.problem().unwrap().instance.as_deref(), Some("GET /configured"));

    let value = Outcome::success_with("hi").into_value_response().unwrap();
    assert_eq!(value.body(), &ResponseBody::Json(json!("hi")));
    assert!(format!("{:?}", config::settings()).contains("ProfileSettings"));
}
