use crate::{WsError, parse_send_message};

use googletest::prelude::*;

#[test]
fn given_object_data_when_parsing_then_payload_is_verbatim_json() {
    // Given
    let body = r#"{"message":"sendmessage","data":{"b": 2, "a":[1,2]}}"#;

    // When
    let payload = parse_send_message(body).unwrap();

    // Then
    assert_eq!(payload.as_text(), Some(r#"{"b": 2, "a":[1,2]}"#));
}

#[test]
fn given_string_data_when_parsing_then_quotes_are_kept() {
    // Given
    let body = r#"{"data":"hello"}"#;

    // When
    let payload = parse_send_message(body).unwrap();

    // Then
    assert_eq!(payload.as_text(), Some(r#""hello""#));
}

#[test]
fn given_missing_data_when_parsing_then_malformed() {
    // When
    let result = parse_send_message(r#"{"message":"sendmessage"}"#);

    // Then
    let err = result.unwrap_err();
    assert!(matches!(err, WsError::MalformedRequest { .. }));
    assert_that!(err.cause(), contains_substring("data"));
}

#[test]
fn given_null_data_when_parsing_then_malformed() {
    // When
    let result = parse_send_message(r#"{"data":null}"#);

    // Then
    assert!(matches!(result, Err(WsError::MalformedRequest { .. })));
}

#[test]
fn given_invalid_json_when_parsing_then_malformed() {
    // When
    let result = parse_send_message("{not json");

    // Then
    assert!(matches!(result, Err(WsError::MalformedRequest { .. })));
}

#[test]
fn given_json_array_when_parsing_then_malformed() {
    // When
    let result = parse_send_message(r#"["data", 1]"#);

    // Then
    assert!(matches!(result, Err(WsError::MalformedRequest { .. })));
}

#[test]
fn given_falsy_data_when_parsing_then_accepted() {
    // When
    let zero = parse_send_message(r#"{"data":0}"#).unwrap();
    let empty = parse_send_message(r#"{"data":""}"#).unwrap();

    // Then
    assert_eq!(zero.as_text(), Some("0"));
    assert_eq!(empty.as_text(), Some(r#""""#));
}
