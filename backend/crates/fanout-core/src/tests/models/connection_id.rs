use crate::ConnectionId;
use crate::models::connection_id::MAX_CONNECTION_ID_LENGTH;

use std::collections::HashSet;
use std::str::FromStr;

use googletest::prelude::*;
use proptest::prelude::*;

#[test]
fn given_generated_ids_when_compared_then_unique_and_url_safe() {
    let ids: HashSet<ConnectionId> = (0..500).map(|_| ConnectionId::generate()).collect();

    assert_that!(ids.len(), eq(500));
    for id in &ids {
        assert_that!(id.as_str().len(), eq(16));
        assert!(
            id.as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }
}

#[test]
fn given_empty_string_when_parsed_then_error() {
    assert_that!(ConnectionId::parse(""), err(anything()));
}

#[test]
fn given_whitespace_when_parsed_then_error() {
    assert_that!(ConnectionId::parse("abc def"), err(anything()));
    assert_that!(ConnectionId::parse("abc\n"), err(anything()));
}

#[test]
fn given_too_long_id_when_parsed_then_error() {
    let long = "a".repeat(MAX_CONNECTION_ID_LENGTH + 1);
    assert_that!(ConnectionId::parse(&long), err(anything()));
}

#[test]
fn given_transport_style_id_when_parsed_then_preserved_verbatim() {
    let id = ConnectionId::from_str("L0SM9cOFvHcCIhw=").unwrap();
    assert_that!(id.as_str(), eq("L0SM9cOFvHcCIhw="));
    assert_that!(id.to_string(), eq("L0SM9cOFvHcCIhw="));
}

#[test]
fn given_owned_string_when_converted_then_validated() {
    let id = ConnectionId::try_from(String::from("conn-1")).unwrap();
    assert_eq!(String::from(id), "conn-1");

    assert_that!(ConnectionId::try_from(String::new()), err(anything()));
}

proptest! {
    #[test]
    fn given_printable_ascii_when_parsed_then_round_trips(value in "[!-~]{1,128}") {
        let id = ConnectionId::parse(&value).unwrap();
        prop_assert_eq!(id.as_str(), value.as_str());
    }
}
