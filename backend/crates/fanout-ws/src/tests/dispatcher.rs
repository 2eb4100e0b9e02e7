use crate::{Route, select_route};

use googletest::prelude::*;

#[test]
fn given_sendmessage_frame_when_selecting_then_routes_to_broadcast() {
    assert_that!(
        select_route(r#"{"message":"sendmessage","data":1}"#),
        eq(&Route::SendMessage)
    );
}

#[test]
fn given_other_message_when_selecting_then_unknown_with_key() {
    assert_that!(
        select_route(r#"{"message":"echo"}"#),
        eq(&Route::Unknown("echo".to_string()))
    );
}

#[test]
fn given_route_key_with_different_case_when_selecting_then_unknown() {
    assert_that!(
        select_route(r#"{"message":"SendMessage"}"#),
        eq(&Route::Unknown("SendMessage".to_string()))
    );
}

#[test]
fn given_non_json_frame_when_selecting_then_default_route() {
    assert_that!(
        select_route("hello"),
        eq(&Route::Unknown("$default".to_string()))
    );
}

#[test]
fn given_non_string_message_when_selecting_then_default_route() {
    assert_that!(
        select_route(r#"{"message":42}"#),
        eq(&Route::Unknown("$default".to_string()))
    );
}
