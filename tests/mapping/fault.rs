use std::error::Error as StdError;
use std::fmt;

use problem_rail::mapping::{build_error_from_fault, build_error_from_std, get_messages, get_traces};
use problem_rail::{Error, Fault, FaultKind};

/// A plain error with an optional cause, for building source chains.
#[derive(Debug)]
struct Layered {
    message: &'static str,
    source: Option<Box<Layered>>,
}

impl Layered {
    fn chain(messages: &[&'static str]) -> Self {
        let mut iter = messages.iter().rev();
        let mut current = Layered { message: iter.next().copied().unwrap_or(""), source: None };
        for &message in iter {
            current = Layered { message, source: Some(Box::new(current)) };
        }
        current
    }
}

impl fmt::Display for Layered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)
    }
}

impl StdError for Layered {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_deref().map(|s| s as &(dyn StdError + 'static))
    }
}

#[test]
fn fault_kinds_map_to_statuses() {
    let cases = [
        (Fault::bad_request("m", "TypeX", "TitleX").unwrap(), 400, "TypeX"),
        (Fault::unauthorized("m").unwrap(), 401, "UnauthorizedError"),
        (Fault::forbidden("m").unwrap(), 403, "ForbiddenError"),
        (Fault::not_found("m").unwrap(), 404, "NotFoundError"),
        (Fault::internal_server("m").unwrap(), 500, "InternalServerError"),
        (Fault::internal_server_classified("m", "DbError", "Database down").unwrap(), 500, "DbError"),
    ];

    for (fault, status, error_type) in cases {
        assert_eq!(fault.kind().status(), status);
        let error = build_error_from_fault(&fault);
        assert_eq!(error.status(), status, "{}", fault.kind().name());
        assert_eq!(error.error_type(), error_type);
        assert_eq!(error.message(), "m");
    }
}

#[test]
fn bad_request_fault_keeps_its_classification() {
    let fault = Fault::bad_request("msg", "TypeX", "TitleX").unwrap();
    match fault.kind() {
        FaultKind::BadRequest(c) => {
            assert_eq!(c.error_type, "TypeX");
            assert_eq!(c.error_title, "TitleX");
        },
        other => panic!("unexpected kind {other:?}"),
    }
}

#[test]
fn foreign_errors_become_unclassified_internal_errors() {
    let io = std::io::Error::new(std::io::ErrorKind::Other, "socket closed");
    let error = build_error_from_std(&io);

    assert_eq!(error.status(), 500);
    assert_eq!(error.error_type(), "InternalServerError");
    assert_eq!(error.message(), "socket closed");
}

#[test]
fn foreign_error_without_text_gets_fallback_message() {
    let silent = Layered { message: "", source: None };
    assert_eq!(build_error_from_std(&silent).message(), "An unhandled error occurred.");
}

#[test]
fn error_values_pass_through_unchanged() {
    let original = Error::new("stale").unwrap().as_not_found().with_details("cache miss");
    assert_eq!(build_error_from_std(&original), original);
}

#[test]
fn messages_are_deduplicated_in_order() {
    let chain = Layered::chain(&["A", "B", "B"]);
    assert_eq!(get_messages(&chain, usize::MAX), vec!["A", "B"]);
    assert_eq!(get_messages(&chain, 1), vec!["A"]);
    assert!(get_messages(&chain, 0).is_empty());
}

#[test]
fn traces_point_at_raise_sites() {
    let fault = Fault::not_found("missing").unwrap();
    let traces = get_traces(&fault, usize::MAX);

    assert!(!traces.is_empty());
    assert!(traces[0].contains("fault.rs"));
    assert_eq!(traces[0], format!("{}:{}:{}", file!(), fault.location().line(), fault.location().column()));
}

#[test]
fn plain_errors_have_no_traces() {
    let chain = Layered::chain(&["A", "B"]);
    assert!(get_traces(&chain, usize::MAX).is_empty());
}

#[test]
fn caused_by_folds_the_source_chain() {
    let cause = Fault::internal_server("pool exhausted")
        .unwrap()
        .with_source(Layered::chain(&["connect timeout", "dns failure"]));

    let error = Error::new("could not load orders").unwrap().caused_by(&cause);

    assert_eq!(error.details(), ["pool exhausted", "connect timeout", "dns failure"]);
    assert!(!error.traces().is_empty());
    assert_eq!(error.status(), 500);
}

#[test]
fn caused_by_skips_the_own_message() {
    let cause = Layered::chain(&["same", "deeper"]);
    let error = Error::new("same").unwrap().caused_by(&cause);
    assert_eq!(error.details(), ["deeper"]);
}
