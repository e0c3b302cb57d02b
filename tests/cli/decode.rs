//! Tests for `position-oracle decode`.

use crate::support::*;

#[test]
fn test_decode_result() {
    let t = Test::new();

    let output = t.cmd().args(["decode", POSITION_RESULT_HEX]).output().unwrap();
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "4521.10");
}

#[test]
fn test_decode_without_prefix() {
    let t = Test::new();

    let hex = POSITION_RESULT_HEX.trim_start_matches("0x");
    let output = t.cmd().args(["decode", hex]).output().unwrap();
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "4521.10");
}

#[test]
fn test_decode_rejects_short_input() {
    let t = Test::new();

    let output = t.cmd().args(["decode", "0x06e60e"]).output().unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "32 bytes");
}

#[test]
fn test_decode_rejects_non_hex() {
    let t = Test::new();

    let output = t.cmd().args(["decode", "0xzz"]).output().unwrap();
    assert_failure(&output);
}
