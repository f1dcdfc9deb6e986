use chrono::{TimeZone, Utc};
use problem_rail::{Error, RailError};
use serde_json::json;

#[test]
fn new_error_has_default_classification() {
    let err = Error::new("boom").unwrap();

    assert_eq!(err.message(), "boom");
    assert_eq!(err.error_type(), "InternalServerError");
    assert_eq!(err.title(), "An internal server error occurred.");
    assert_eq!(err.status(), 500);
    assert!(err.details().is_empty());
    assert!(err.traces().is_empty());
    assert!(err.metadata().is_empty());
    assert!(!err.is_none());
}

#[test]
fn blank_message_is_rejected() {
    for message in ["", "   ", "\t\n"] {
        let err = Error::new(message).unwrap_err();
        assert!(matches!(err, RailError::BlankArgument { name: "message" }));
    }
}

#[test]
fn fixed_classifications() {
    let unauthorized = Error::new("who are you").unwrap().as_unauthorized();
    assert_eq!(unauthorized.status(), 401);
    assert_eq!(unauthorized.error_type(), "UnauthorizedError");
    assert_eq!(unauthorized.title(), "An authorization error occurred.");

    let forbidden = Error::new("keep out").unwrap().as_forbidden();
    assert_eq!(forbidden.status(), 403);
    assert_eq!(forbidden.error_type(), "ForbiddenError");
    assert_eq!(forbidden.title(), "Access to the resource is forbidden.");

    let not_found = Error::new("gone").unwrap().as_not_found();
    assert_eq!(not_found.status(), 404);
    assert_eq!(not_found.error_type(), "NotFoundError");
    assert_eq!(not_found.title(), "No data was found at the requested route.");
    assert!(not_found.is_client_error());
}

#[test]
fn bad_request_requires_type_and_title() {
    let err = Error::new("bad").unwrap();

    assert!(err.clone().as_bad_request("", "Title").is_err());
    assert!(err.clone().as_bad_request("Type", " ").is_err());

    let classified = err.as_bad_request("ValidationError", "Invalid input").unwrap();
    assert_eq!(classified.status(), 400);
    assert_eq!(classified.error_type(), "ValidationError");
    assert_eq!(classified.title(), "Invalid input");
}

#[test]
fn internal_server_requires_only_one_of_type_and_title() {
    let err = Error::new("crash").unwrap().as_not_found();

    let only_type = err.clone().as_internal_server("DbError", "").unwrap();
    assert_eq!(only_type.status(), 500);
    assert_eq!(only_type.error_type(), "DbError");
    assert_eq!(only_type.title(), "");

    let only_title = err.clone().as_internal_server("", "Database down").unwrap();
    assert_eq!(only_title.title(), "Database down");

    let missing = err.as_internal_server(" ", "").unwrap_err();
    assert!(matches!(missing, RailError::MissingClassification { .. }));
}

#[test]
fn details_skip_blank_duplicates_and_the_message() {
    let err = Error::new("primary")
        .unwrap()
        .with_details("first")
        .with_details("primary")
        .with_details("  ")
        .with_details("first")
        .with_details("second");

    assert_eq!(err.details(), ["first", "second"]);
}

#[test]
fn metadata_is_inserted_and_queried() {
    let err = Error::new("boom")
        .unwrap()
        .with_metadata("attempt", 3)
        .unwrap()
        .with_metadata("attempt", 4)
        .unwrap()
        .with_metadata_map([("tenant", json!("acme")), ("flags", json!(["a", "b"]))])
        .unwrap();

    assert_eq!(err.metadata().len(), 3);
    assert_eq!(err.metadata()["attempt"], json!(4));
    assert!(err.has_metadata_key("tenant").unwrap());
    assert!(!err.has_metadata_key("region").unwrap());
    assert!(err.has_metadata("attempt", |v| v.as_i64() == Some(4)).unwrap());
    assert!(!err.has_metadata("region", |_| true).unwrap());
}

#[test]
fn metadata_rejects_blank_keys_and_null_values() {
    let err = Error::new("boom").unwrap();

    assert!(matches!(
        err.clone().with_metadata(" ", 1).unwrap_err(),
        RailError::BlankArgument { name: "key" }
    ));
    assert!(matches!(
        err.clone().with_metadata("k", serde_json::Value::Null).unwrap_err(),
        RailError::NullMetadataValue { .. }
    ));
    assert!(err.has_metadata_key("").is_err());
    assert!(err.has_metadata("", |_| true).is_err());
}

#[test]
fn timestamp_can_be_replaced() {
    let ts = Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap();
    let err = Error::new("boom").unwrap().with_timestamp(ts);
    assert_eq!(err.timestamp(), ts);
}

#[test]
fn details_participate_in_equality() {
    let a = Error::new("same").unwrap();
    let c = Error::new("same").unwrap().with_details("extra");
    assert_ne!(a, c);
}

#[test]
fn serializes_with_camel_case_fields() {
    let err = Error::new("boom").unwrap().with_metadata("id", 9).unwrap();
    let value = serde_json::to_value(&err).unwrap();

    assert_eq!(value["message"], "boom");
    assert_eq!(value["type"], "InternalServerError");
    assert_eq!(value["status"], 500);
    assert_eq!(value["metadata"]["id"], 9);
}
