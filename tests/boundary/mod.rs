use std::fmt;
use std::sync::Arc;

use http::header::CONTENT_TYPE;
use parking_lot::Mutex;
use problem_rail::mapping::{ProblemDocument, RequestInfo};
use problem_rail::{Error, ExceptionBoundary, Fault};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

fn request() -> RequestInfo {
    RequestInfo::new("POST", "/payments")
        .with_content_type("application/json; v=3")
        .with_header("x-request-id", "pay-1")
}

#[test]
fn faults_become_problem_responses() {
    let fault = Fault::bad_request("amount must be positive", "AmountError", "Invalid amount").unwrap();
    let response = ExceptionBoundary::new().handle(&request(), &fault).unwrap();

    assert_eq!(response.status(), 400);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/problem+json");

    let doc = ProblemDocument::from_json(response.body()).unwrap();
    assert_eq!(doc.problem_type.as_deref(), Some("AmountError"));
    assert_eq!(doc.title.as_deref(), Some("Invalid amount"));
    assert_eq!(doc.detail.as_deref(), Some("amount must be positive"));
    assert_eq!(doc.instance.as_deref(), Some("POST /payments"));
    assert_eq!(doc.request_id(), Some("pay-1"));
    assert_eq!(doc.version(), Some("3"));
}

#[test]
fn unknown_errors_become_internal_server_errors() {
    let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
    let response = ExceptionBoundary::new().handle(&request(), &io).unwrap();

    assert_eq!(response.status(), 500);
    let doc = ProblemDocument::from_json(response.body()).unwrap();
    assert_eq!(doc.problem_type.as_deref(), Some("InternalServerError"));
    assert_eq!(doc.detail.as_deref(), Some("disk on fire"));
}

#[test]
fn error_values_keep_their_classification() {
    let error = Error::new("token expired").unwrap().as_unauthorized();
    let doc = ExceptionBoundary::new().problem_for(&request(), &error);

    assert_eq!(doc.status, Some(401));
    assert_eq!(doc.problem_type.as_deref(), Some("UnauthorizedError"));
}

#[test]
fn classified_internal_fault_keeps_type_and_title() {
    let fault = Fault::internal_server_classified("ledger locked", "LedgerError", "Ledger unavailable")
        .unwrap();
    let doc = ExceptionBoundary::new().problem_for(&request(), &fault);

    assert_eq!(doc.status, Some(500));
    assert_eq!(doc.problem_type.as_deref(), Some("LedgerError"));
    assert_eq!(doc.title.as_deref(), Some("Ledger unavailable"));
}

/// Records, per event, its level and the names of the fields that carried a value.
#[derive(Clone, Default)]
struct RecordedEvents(Arc<Mutex<Vec<(Level, Vec<&'static str>)>>>);

struct FieldNames(Vec<&'static str>);

impl Visit for FieldNames {
    fn record_debug(&mut self, field: &Field, _value: &dyn fmt::Debug) {
        self.0.push(field.name());
    }
}

impl<S: Subscriber> Layer<S> for RecordedEvents {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut names = FieldNames(Vec::new());
        event.record(&mut names);
        self.0.lock().push((*event.metadata().level(), names.0));
    }
}

#[test]
fn unhandled_fault_is_logged_once() {
    let events = RecordedEvents::default();
    let subscriber = tracing_subscriber::registry().with(events.clone());

    let fault = Fault::forbidden("card is frozen").unwrap();
    tracing::subscriber::with_default(subscriber, || {
        ExceptionBoundary::new().handle(&request(), &fault).unwrap();
    });

    let recorded = events.0.lock();
    assert_eq!(recorded.len(), 1);

    let (level, fields) = &recorded[0];
    assert_eq!(*level, Level::ERROR);
    for name in ["message", "title", "status_code", "error_type", "fault", "problem"] {
        assert!(fields.contains(&name), "missing field {name}");
    }
}

#[test]
fn logged_errors_carry_no_boundary_fields() {
    let events = RecordedEvents::default();
    let subscriber = tracing_subscriber::registry().with(events.clone());

    tracing::subscriber::with_default(subscriber, || {
        problem_rail::logging::log_error(&Error::new("quota reached").unwrap());
    });

    let recorded = events.0.lock();
    assert_eq!(recorded.len(), 1);
    let (_, fields) = &recorded[0];
    assert!(fields.contains(&"title"));
    assert!(!fields.contains(&"fault"));
    assert!(!fields.contains(&"problem"));
}
