use crate::Config;
use crate::tests::{EnvGuard, setup_config_dir};

use googletest::assert_that;
use googletest::prelude::{anything, err};
use serial_test::serial;

// =========================================================================
// Validation Tests - WebSocket
// =========================================================================

#[test]
#[serial]
fn given_timeout_less_than_interval_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _interval = EnvGuard::set("FANOUT_WS_HEARTBEAT_INTERVAL_SECS", "60");
    let _timeout = EnvGuard::set("FANOUT_WS_HEARTBEAT_TIMEOUT_SECS", "30");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_send_buffer_zero_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _buffer = EnvGuard::set("FANOUT_WS_SEND_BUFFER_SIZE", "0");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_tiny_max_message_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _max = EnvGuard::set("FANOUT_WS_MAX_MESSAGE_BYTES", "16");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}
