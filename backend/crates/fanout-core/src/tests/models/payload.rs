use crate::Payload;

use bytes::Bytes;
use googletest::prelude::*;

#[test]
fn given_utf8_payload_when_as_text_then_some() {
    let payload = Payload::from(String::from(r#"{"hello":"world"}"#));

    assert_that!(payload.as_text(), some(eq(r#"{"hello":"world"}"#)));
    assert_that!(payload.len(), eq(17));
}

#[test]
fn given_binary_payload_when_as_text_then_none() {
    let payload = Payload::new(Bytes::from_static(&[0xff, 0xfe, 0x00]));

    assert_that!(payload.as_text(), none());
    assert!(!payload.is_empty());
}

#[test]
fn given_payload_when_cloned_then_shares_bytes() {
    let payload = Payload::from("shared");
    let clone = payload.clone();

    assert_that!(clone.bytes().as_ptr(), eq(payload.bytes().as_ptr()));
}
